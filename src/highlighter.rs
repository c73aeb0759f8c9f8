// ABOUTME: Syntax highlighter for the REPL with ANSI color support
// Implements rustyline's Highlighter trait to colorize Mal syntax while
// preserving display width

use rustyline::completion::Completer;
use rustyline::highlight::{CmdKind, Highlighter};
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Helper;
use std::borrow::Cow;

// ANSI color codes (3-bit/4-bit colors for maximum terminal compatibility)
const COLOR_RESET: &str = "\x1b[0m";
const COLOR_SPECIAL_FORM: &str = "\x1b[1;35m"; // Bold magenta
const COLOR_NUMBER: &str = "\x1b[33m"; // Yellow
const COLOR_STRING: &str = "\x1b[32m"; // Green
const COLOR_KEYWORD: &str = "\x1b[36m"; // Cyan
const COLOR_LITERAL: &str = "\x1b[33m"; // Yellow
const COLOR_COMMENT: &str = "\x1b[90m"; // Bright black (gray)

const SPECIAL_FORMS: &[&str] = &[
    "def!",
    "defmacro!",
    "do",
    "fn*",
    "if",
    "let*",
    "macroexpand",
    "quasiquote",
    "quote",
    "splice-unquote",
    "try*",
    "catch*",
    "unquote",
];

/// REPL helper providing syntax-aware color highlighting
pub struct MalHelper;

impl MalHelper {
    pub fn new() -> Self {
        MalHelper
    }
}

impl Default for MalHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for MalHelper {}

impl Completer for MalHelper {
    type Candidate = String;
}

impl Hinter for MalHelper {
    type Hint = String;
}

impl Validator for MalHelper {}

impl Highlighter for MalHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let highlighted = highlight_line(line);
        if highlighted == line {
            Cow::Borrowed(line)
        } else {
            Cow::Owned(highlighted)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || "[]{}()'\"`,;".contains(c)
}

fn colorize(out: &mut String, color: &str, text: &str) {
    out.push_str(color);
    out.push_str(text);
    out.push_str(COLOR_RESET);
}

/// Walk the line token by token and wrap interesting spans in color codes
fn highlight_line(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            // Comment runs to end of line
            ';' => {
                let rest: String = chars[i..].iter().collect();
                colorize(&mut out, COLOR_COMMENT, &rest);
                break;
            }

            // String with escapes; an unclosed string colors to the end
            '"' => {
                let start = i;
                i += 1;
                while i < chars.len() {
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        i += 2;
                    } else if chars[i] == '"' {
                        i += 1;
                        break;
                    } else {
                        i += 1;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                colorize(&mut out, COLOR_STRING, &text);
            }

            c if is_delimiter(c) => {
                out.push(c);
                i += 1;
            }

            // Atom: number, keyword, literal, special form, or plain symbol
            _ => {
                let start = i;
                while i < chars.len() && !is_delimiter(chars[i]) {
                    i += 1;
                }
                let token: String = chars[start..i].iter().collect();

                if token.parse::<i64>().is_ok() {
                    colorize(&mut out, COLOR_NUMBER, &token);
                } else if token.starts_with(':') {
                    colorize(&mut out, COLOR_KEYWORD, &token);
                } else if matches!(token.as_str(), "nil" | "true" | "false") {
                    colorize(&mut out, COLOR_LITERAL, &token);
                } else if SPECIAL_FORMS.contains(&token.as_str()) {
                    colorize(&mut out, COLOR_SPECIAL_FORM, &token);
                } else {
                    out.push_str(&token);
                }
            }
        }
    }

    out
}
