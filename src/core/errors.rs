//! Exception support: throw
//!
//! `throw` raises any value; `try*`/`catch*` in the evaluator hands the
//! exact value to the handler.

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

/// Raise a value as an exception
pub fn builtin_throw(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("throw", "1", args.len()));
    }
    Err(EvalError::Thrown(args[0].clone()))
}

/// Register the exception builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.set("throw", Value::builtin(builtin_throw));
}
