// ABOUTME: Reader module tokenizing source text and parsing it into values

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{anychar, char, none_of},
    combinator::{opt, recognize, value},
    multi::many0,
    sequence::preceded,
    IResult, Parser,
};
use thiserror::Error;

use crate::value::{MapKey, Value};
use std::collections::HashMap;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// Nothing but whitespace and comments; the REPL re-prompts silently.
    #[error("no input")]
    EmptyInput,

    #[error("unbalanced parentheses: expected ')'")]
    UnbalancedParens,

    #[error("unbalanced brackets: expected ']'")]
    UnbalancedBrackets,

    #[error("unbalanced braces: expected '}}'")]
    UnbalancedBraces,

    #[error("unbalanced string: expected '\"'")]
    UnbalancedString,

    #[error("map literal has an odd number of forms")]
    MissingMapValue,

    #[error("invalid map key: {0} (expected symbol, keyword, or string)")]
    InvalidMapKey(String),

    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    #[error("unexpected end of input")]
    UnexpectedEof,
}

// ============================================================================
// Tokenizer
// ============================================================================

/// `~@` or a single reader macro / delimiter character
fn lex_special(input: &str) -> IResult<&str, &str> {
    alt((tag("~@"), recognize(one_of_special))).parse(input)
}

fn one_of_special(input: &str) -> IResult<&str, char> {
    nom::character::complete::one_of("[]{}()'`~^@")(input)
}

/// A double-quoted string. The closing quote is optional here; its absence
/// is reported when the token is turned into an atom.
fn lex_string(input: &str) -> IResult<&str, &str> {
    recognize((
        char('"'),
        many0(alt((
            value((), preceded(char('\\'), anychar)),
            value((), none_of("\\\"")),
        ))),
        opt(char('"')),
    ))
    .parse(input)
}

/// A `;` comment running to end of line
fn lex_comment(input: &str) -> IResult<&str, &str> {
    recognize((char(';'), take_while(|c| c != '\n'))).parse(input)
}

/// A maximal run of non-delimiter characters
fn lex_atom(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && !"[]{}()'\"`,;".contains(c))(input)
}

/// Commas count as whitespace between tokens
fn skip_blank(input: &str) -> &str {
    input.trim_start_matches(|c: char| c.is_whitespace() || c == ',')
}

/// Split source text into raw tokens, dropping comments.
pub fn tokenize(input: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut rest = skip_blank(input);
    while !rest.is_empty() {
        let parsed: IResult<&str, &str> =
            alt((lex_special, lex_string, lex_comment, lex_atom)).parse(rest);
        match parsed {
            Ok((next, token)) => {
                if !token.starts_with(';') {
                    tokens.push(token);
                }
                rest = skip_blank(next);
            }
            Err(_) => break,
        }
    }
    tokens
}

// ============================================================================
// Parser
// ============================================================================

struct Reader<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

/// Parse a single form out of the source text.
pub fn read_str(input: &str) -> Result<Value, ReadError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(ReadError::EmptyInput);
    }
    let mut reader = Reader { tokens, pos: 0 };
    read_form(&mut reader)
}

fn read_form(reader: &mut Reader) -> Result<Value, ReadError> {
    let token = reader.peek().ok_or(ReadError::UnexpectedEof)?;
    match token {
        "(" => {
            reader.advance();
            Ok(Value::list(read_seq(reader, ")")?))
        }
        "[" => {
            reader.advance();
            Ok(Value::vector(read_seq(reader, "]")?))
        }
        "{" => {
            reader.advance();
            read_hash_map(reader)
        }
        "'" => {
            reader.advance();
            wrap("quote", reader)
        }
        "`" => {
            reader.advance();
            wrap("quasiquote", reader)
        }
        "~" => {
            reader.advance();
            wrap("unquote", reader)
        }
        "~@" => {
            reader.advance();
            wrap("splice-unquote", reader)
        }
        "@" => {
            reader.advance();
            wrap("deref", reader)
        }
        "^" => {
            // ^meta form reads the metadata first but applies it second
            reader.advance();
            let meta = read_form(reader)?;
            let form = read_form(reader)?;
            Ok(Value::list(vec![Value::sym("with-meta"), form, meta]))
        }
        ")" | "]" | "}" => Err(ReadError::UnexpectedToken(token.to_string())),
        _ => {
            reader.advance();
            read_atom(token)
        }
    }
}

/// `(sugar x)` reader shorthand
fn wrap(name: &str, reader: &mut Reader) -> Result<Value, ReadError> {
    let form = read_form(reader)?;
    Ok(Value::list(vec![Value::sym(name), form]))
}

fn read_seq(reader: &mut Reader, end: &str) -> Result<Vec<Value>, ReadError> {
    let mut items = Vec::new();
    loop {
        match reader.peek() {
            None => {
                return Err(match end {
                    ")" => ReadError::UnbalancedParens,
                    "]" => ReadError::UnbalancedBrackets,
                    _ => ReadError::UnbalancedBraces,
                })
            }
            Some(token) if token == end => {
                reader.advance();
                return Ok(items);
            }
            Some(_) => items.push(read_form(reader)?),
        }
    }
}

fn read_hash_map(reader: &mut Reader) -> Result<Value, ReadError> {
    let forms = read_seq(reader, "}")?;
    if forms.len() % 2 != 0 {
        return Err(ReadError::MissingMapValue);
    }
    let mut entries = HashMap::new();
    for pair in forms.chunks(2) {
        let key = MapKey::from_value(&pair[0])
            .ok_or_else(|| ReadError::InvalidMapKey(crate::printer::pr_str(&pair[0], true)))?;
        entries.insert(key, pair[1].clone());
    }
    Ok(Value::map(entries))
}

fn read_atom(token: &str) -> Result<Value, ReadError> {
    if let Ok(n) = token.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    match token {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        "nil" => Ok(Value::Nil),
        _ => {
            if let Some(name) = token.strip_prefix(':') {
                Ok(Value::Kw(name.to_string()))
            } else if token.starts_with('"') {
                Ok(Value::Str(unescape_string_token(token)?))
            } else {
                Ok(Value::Sym(token.to_string()))
            }
        }
    }
}

/// Strip the surrounding quotes and process `\\`, `\"`, and `\n`. Any other
/// backslash pair passes through verbatim. A missing closing quote is the
/// unbalanced-string error.
fn unescape_string_token(token: &str) -> Result<String, ReadError> {
    let mut out = String::new();
    let mut chars = token[1..].chars();
    loop {
        match chars.next() {
            None => return Err(ReadError::UnbalancedString),
            Some('"') => return Ok(out),
            Some('\\') => match chars.next() {
                Some('n') => out.push('\n'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => return Err(ReadError::UnbalancedString),
            },
            Some(c) => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("(+ 1 2)"), vec!["(", "+", "1", "2", ")"]);
        assert_eq!(tokenize("  12   "), vec!["12"]);
        assert_eq!(tokenize("1, 2,,3"), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_tokenize_specials() {
        assert_eq!(tokenize("~@(a)"), vec!["~@", "(", "a", ")"]);
        assert_eq!(tokenize("'`~^@"), vec!["'", "`", "~", "^", "@"]);
    }

    #[test]
    fn test_tokenize_strings_and_comments() {
        assert_eq!(tokenize(r#""a b" ; trailing"#), vec![r#""a b""#]);
        assert_eq!(tokenize("; whole line\n42"), vec!["42"]);
        assert_eq!(tokenize(r#""esc\"aped""#), vec![r#""esc\"aped""#]);
    }

    #[test]
    fn test_read_scalars() {
        assert_eq!(read_str("42"), Ok(Value::Int(42)));
        assert_eq!(read_str("-42"), Ok(Value::Int(-42)));
        assert_eq!(read_str("true"), Ok(Value::Bool(true)));
        assert_eq!(read_str("false"), Ok(Value::Bool(false)));
        assert_eq!(read_str("nil"), Ok(Value::Nil));
        assert_eq!(read_str("abc"), Ok(Value::Sym("abc".into())));
        assert_eq!(read_str(":abc"), Ok(Value::Kw("abc".into())));
        assert_eq!(read_str("123abc"), Ok(Value::Sym("123abc".into())));
    }

    #[test]
    fn test_read_strings() {
        assert_eq!(read_str(r#""hello""#), Ok(Value::Str("hello".into())));
        assert_eq!(read_str(r#""""#), Ok(Value::Str(String::new())));
        assert_eq!(read_str(r#""a\nb""#), Ok(Value::Str("a\nb".into())));
        assert_eq!(read_str(r#""a\"b""#), Ok(Value::Str("a\"b".into())));
        assert_eq!(read_str(r#""a\\b""#), Ok(Value::Str("a\\b".into())));
    }

    #[test]
    fn test_read_unbalanced_string() {
        assert_eq!(read_str(r#""abc"#), Err(ReadError::UnbalancedString));
        assert_eq!(read_str(r#""abc\""#), Err(ReadError::UnbalancedString));
    }

    #[test]
    fn test_read_list() {
        let form = read_str("(+ 1 2)").unwrap();
        assert_eq!(
            form,
            Value::list(vec![Value::sym("+"), Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_read_vector_and_map() {
        assert_eq!(
            read_str("[1 2]").unwrap(),
            Value::vector(vec![Value::Int(1), Value::Int(2)])
        );

        let map = read_str(r#"{:a 1 "b" 2}"#).unwrap();
        match map {
            Value::Map(entries, _) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[&MapKey::Kw("a".into())], Value::Int(1));
                assert_eq!(entries[&MapKey::Str("b".into())], Value::Int(2));
            }
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_read_map_errors() {
        assert_eq!(read_str("{:a}"), Err(ReadError::MissingMapValue));
        assert!(matches!(
            read_str("{1 2}"),
            Err(ReadError::InvalidMapKey(_))
        ));
        assert_eq!(read_str("{:a 1"), Err(ReadError::UnbalancedBraces));
    }

    #[test]
    fn test_read_quoting_sugar() {
        assert_eq!(
            read_str("'x").unwrap(),
            Value::list(vec![Value::sym("quote"), Value::sym("x")])
        );
        assert_eq!(
            read_str("`x").unwrap(),
            Value::list(vec![Value::sym("quasiquote"), Value::sym("x")])
        );
        assert_eq!(
            read_str("~x").unwrap(),
            Value::list(vec![Value::sym("unquote"), Value::sym("x")])
        );
        assert_eq!(
            read_str("~@xs").unwrap(),
            Value::list(vec![Value::sym("splice-unquote"), Value::sym("xs")])
        );
        assert_eq!(
            read_str("@a").unwrap(),
            Value::list(vec![Value::sym("deref"), Value::sym("a")])
        );
    }

    #[test]
    fn test_read_with_meta_swaps_arguments() {
        assert_eq!(
            read_str(r#"^{:a 1} [1]"#).unwrap(),
            Value::list(vec![
                Value::sym("with-meta"),
                Value::vector(vec![Value::Int(1)]),
                read_str("{:a 1}").unwrap(),
            ])
        );
    }

    #[test]
    fn test_read_errors() {
        assert_eq!(read_str(""), Err(ReadError::EmptyInput));
        assert_eq!(read_str("   ; only a comment"), Err(ReadError::EmptyInput));
        assert_eq!(read_str("(1 2"), Err(ReadError::UnbalancedParens));
        assert_eq!(read_str("[1 2"), Err(ReadError::UnbalancedBrackets));
        assert_eq!(read_str(")"), Err(ReadError::UnexpectedToken(")".into())));
    }

    #[test]
    fn test_round_trip_canonical_forms() {
        for src in [
            "(1 2 (3 4) nil)",
            "[1 [2] {:a 1}]",
            "(quote abc)",
            r#""with \"escapes\" and \n""#,
            ":kw",
        ] {
            let form = read_str(src).unwrap();
            let printed = crate::printer::pr_str(&form, true);
            assert_eq!(read_str(&printed).unwrap(), form, "round trip of {}", src);
        }
    }
}
