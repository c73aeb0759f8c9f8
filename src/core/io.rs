//! Reader and I/O operations: read-string, slurp, readline, time-ms

use crate::env::Environment;
use crate::error::EvalError;
use crate::reader;
use crate::value::Value;
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

fn str_arg<'a>(function: &str, args: &'a [Value], position: usize) -> Result<&'a str, EvalError> {
    match &args[position] {
        Value::Str(s) => Ok(s),
        other => Err(EvalError::type_error(function, "string", other, position + 1)),
    }
}

/// Parse one form out of a string. Reader errors surface as evaluation
/// errors (and so reach `catch*` as strings).
pub fn builtin_read_string(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("read-string", "1", args.len()));
    }
    let source = str_arg("read-string", args, 0)?;
    reader::read_str(source).map_err(|e| EvalError::Syntax(format!("read-string: {}", e)))
}

/// Read a whole file into a string
pub fn builtin_slurp(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("slurp", "1", args.len()));
    }
    let path = str_arg("slurp", args, 0)?;
    std::fs::read_to_string(path)
        .map(Value::Str)
        .map_err(|e| EvalError::runtime_error("slurp", format!("{}: {}", path, e)))
}

/// Prompt on stdout and read one line from stdin; EOF gives nil
pub fn builtin_readline(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("readline", "1", args.len()));
    }
    let prompt = str_arg("readline", args, 0)?;

    print!("{}", prompt);
    std::io::stdout()
        .flush()
        .map_err(|e| EvalError::runtime_error("readline", e.to_string()))?;

    let mut line = String::new();
    let read = std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| EvalError::runtime_error("readline", e.to_string()))?;
    if read == 0 {
        return Ok(Value::Nil);
    }
    if line.ends_with('\n') {
        line.pop();
    }
    Ok(Value::Str(line))
}

/// Milliseconds since the Unix epoch
pub fn builtin_time_ms(args: &[Value]) -> Result<Value, EvalError> {
    if !args.is_empty() {
        return Err(EvalError::arity_error("time-ms", "0", args.len()));
    }
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| EvalError::runtime_error("time-ms", e.to_string()))?;
    Ok(Value::Int(elapsed.as_millis() as i64))
}

/// Register all reader/IO builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.set("read-string", Value::builtin(builtin_read_string));
    env.set("slurp", Value::builtin(builtin_slurp));
    env.set("readline", Value::builtin(builtin_readline));
    env.set("time-ms", Value::builtin(builtin_time_ms));
}
