//! Arithmetic operations: +, -, *, /
//!
//! Variadic integer arithmetic with checked overflow.
//!
//! - `+`: Sum of all arguments (identity: 0)
//! - `-`: Subtract subsequent args from first, or negate if single arg
//! - `*`: Product of all arguments (identity: 1)
//! - `/`: Divide first by subsequent args, or integer reciprocal if single arg

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn int_arg(function: &str, args: &[Value], position: usize) -> Result<i64, EvalError> {
    match &args[position] {
        Value::Int(n) => Ok(*n),
        other => Err(EvalError::type_error(function, "int", other, position + 1)),
    }
}

fn overflow(function: &str) -> EvalError {
    EvalError::runtime_error(function, "integer overflow")
}

/// Returns the sum of all arguments; `(+)` is 0.
pub fn builtin_add(args: &[Value]) -> Result<Value, EvalError> {
    let mut sum: i64 = 0;
    for position in 0..args.len() {
        let n = int_arg("+", args, position)?;
        sum = sum.checked_add(n).ok_or_else(|| overflow("+"))?;
    }
    Ok(Value::Int(sum))
}

/// Subtracts subsequent arguments from the first; `(- x)` negates.
pub fn builtin_sub(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("-", "at least 1", 0));
    }
    let first = int_arg("-", args, 0)?;
    if args.len() == 1 {
        return first.checked_neg().map(Value::Int).ok_or_else(|| overflow("-"));
    }
    let mut result = first;
    for position in 1..args.len() {
        let n = int_arg("-", args, position)?;
        result = result.checked_sub(n).ok_or_else(|| overflow("-"))?;
    }
    Ok(Value::Int(result))
}

/// Returns the product of all arguments; `(*)` is 1 and `(* x)` is x.
pub fn builtin_mul(args: &[Value]) -> Result<Value, EvalError> {
    let mut product: i64 = 1;
    for position in 0..args.len() {
        let n = int_arg("*", args, position)?;
        product = product.checked_mul(n).ok_or_else(|| overflow("*"))?;
    }
    Ok(Value::Int(product))
}

/// Divides the first argument by the rest; `(/ x)` is the integer
/// reciprocal. Truncating division; dividing by zero is an error.
pub fn builtin_div(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("/", "at least 1", 0));
    }
    let first = int_arg("/", args, 0)?;
    if args.len() == 1 {
        if first == 0 {
            return Err(EvalError::runtime_error("/", "division by zero"));
        }
        return Ok(Value::Int(1 / first));
    }
    let mut result = first;
    for position in 1..args.len() {
        let n = int_arg("/", args, position)?;
        if n == 0 {
            return Err(EvalError::runtime_error("/", "division by zero"));
        }
        result = result.checked_div(n).ok_or_else(|| overflow("/"))?;
    }
    Ok(Value::Int(result))
}

/// Register all arithmetic builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.set("+", Value::builtin(builtin_add));
    env.set("-", Value::builtin(builtin_sub));
    env.set("*", Value::builtin(builtin_mul));
    env.set("/", Value::builtin(builtin_div));
}
