//! Printing operations: pr-str, str, prn, println
//!
//! The readable pair (`pr-str`, `prn`) escapes strings so output reads
//! back; the raw pair (`str`, `println`) emits string contents verbatim.
//! `prn` and `println` write to stdout and return nil.

use crate::env::Environment;
use crate::error::EvalError;
use crate::printer::pr_seq;
use crate::value::Value;
use std::rc::Rc;

/// Space-joined readable rendering of the arguments
pub fn builtin_pr_str(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Str(pr_seq(args, true, " ")))
}

/// Concatenated raw rendering of the arguments
pub fn builtin_str(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Str(pr_seq(args, false, "")))
}

/// Print readably to stdout, return nil
pub fn builtin_prn(args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", pr_seq(args, true, " "));
    Ok(Value::Nil)
}

/// Print raw to stdout, return nil
pub fn builtin_println(args: &[Value]) -> Result<Value, EvalError> {
    println!("{}", pr_seq(args, false, " "));
    Ok(Value::Nil)
}

/// Register all printing builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.set("pr-str", Value::builtin(builtin_pr_str));
    env.set("str", Value::builtin(builtin_str));
    env.set("prn", Value::builtin(builtin_prn));
    env.set("println", Value::builtin(builtin_println));
}
