// ABOUTME: Printer module converting values back to source text

use crate::value::Value;

/// Render a value as source text. With `readable` set, strings come out
/// quoted with `\`, `"`, and newline escaped so the result reads back as
/// the same value; otherwise raw string contents are emitted.
pub fn pr_str(value: &Value, readable: bool) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(n) => n.to_string(),
        Value::Str(s) => {
            if readable {
                format!("\"{}\"", escape(s))
            } else {
                s.clone()
            }
        }
        Value::Sym(s) => s.clone(),
        Value::Kw(k) => format!(":{}", k),
        Value::List(items, _) => format!("({})", pr_seq(items, readable, " ")),
        Value::Vector(items, _) => format!("[{}]", pr_seq(items, readable, " ")),
        Value::Map(entries, _) => {
            // Keys are printed sorted; insertion order is not observable.
            let mut keys: Vec<_> = entries.keys().collect();
            keys.sort();
            let body = keys
                .into_iter()
                .map(|k| {
                    format!(
                        "{} {}",
                        pr_str(&k.to_value(), readable),
                        pr_str(&entries[k], readable)
                    )
                })
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{{}}}", body)
        }
        Value::Builtin(..) => "#<builtin>".to_string(),
        Value::Lambda(lambda) => {
            if lambda.is_macro {
                "#<macro>".to_string()
            } else {
                "#<function>".to_string()
            }
        }
        Value::Atom(cell) => format!("(atom {})", pr_str(&cell.borrow(), readable)),
    }
}

/// Join a sequence of printed values with `sep`.
pub fn pr_seq(items: &[Value], readable: bool, sep: &str) -> String {
    items
        .iter()
        .map(|item| pr_str(item, readable))
        .collect::<Vec<_>>()
        .join(sep)
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
