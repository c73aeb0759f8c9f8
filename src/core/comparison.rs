//! Comparison operations: =, <, <=, >, >=
//!
//! `=` is the structural equality of the value model (lists and vectors
//! compare sequence-equal across kinds). The ordering operators compare
//! integers only.

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn int_pair(function: &str, args: &[Value]) -> Result<(i64, i64), EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error(function, "2", args.len()));
    }
    let a = match &args[0] {
        Value::Int(n) => *n,
        other => return Err(EvalError::type_error(function, "int", other, 1)),
    };
    let b = match &args[1] {
        Value::Int(n) => *n,
        other => return Err(EvalError::type_error(function, "int", other, 2)),
    };
    Ok((a, b))
}

/// Structural equality across all value types
pub fn builtin_eq(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("=", "2", args.len()));
    }
    Ok(Value::Bool(args[0] == args[1]))
}

pub fn builtin_lt(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = int_pair("<", args)?;
    Ok(Value::Bool(a < b))
}

pub fn builtin_le(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = int_pair("<=", args)?;
    Ok(Value::Bool(a <= b))
}

pub fn builtin_gt(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = int_pair(">", args)?;
    Ok(Value::Bool(a > b))
}

pub fn builtin_ge(args: &[Value]) -> Result<Value, EvalError> {
    let (a, b) = int_pair(">=", args)?;
    Ok(Value::Bool(a >= b))
}

/// Register all comparison builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.set("=", Value::builtin(builtin_eq));
    env.set("<", Value::builtin(builtin_lt));
    env.set("<=", Value::builtin(builtin_le));
    env.set(">", Value::builtin(builtin_gt));
    env.set(">=", Value::builtin(builtin_ge));
}
