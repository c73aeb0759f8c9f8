//! Metadata operations: meta, with-meta
//!
//! Collections and callables carry metadata; `with-meta` returns a shallow
//! copy with the slot replaced, `meta` reads it (nil when absent or the
//! value cannot carry any).

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{Lambda, Value};
use std::rc::Rc;

/// The metadata attached to a value, nil by default
pub fn builtin_meta(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("meta", "1", args.len()));
    }
    let meta = match &args[0] {
        Value::List(_, meta) | Value::Vector(_, meta) | Value::Map(_, meta) => (**meta).clone(),
        Value::Builtin(_, meta) => (**meta).clone(),
        Value::Lambda(lambda) => lambda.meta.clone(),
        _ => Value::Nil,
    };
    Ok(meta)
}

/// A shallow copy of a collection or callable with its metadata replaced
pub fn builtin_with_meta(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("with-meta", "2", args.len()));
    }
    let meta = Rc::new(args[1].clone());
    match &args[0] {
        Value::List(items, _) => Ok(Value::List(Rc::clone(items), meta)),
        Value::Vector(items, _) => Ok(Value::Vector(Rc::clone(items), meta)),
        Value::Map(entries, _) => Ok(Value::Map(Rc::clone(entries), meta)),
        Value::Builtin(func, _) => Ok(Value::Builtin(*func, meta)),
        Value::Lambda(lambda) => Ok(Value::Lambda(Rc::new(Lambda {
            meta: args[1].clone(),
            ..(**lambda).clone()
        }))),
        other => Err(EvalError::type_error(
            "with-meta",
            "collection or function",
            other,
            1,
        )),
    }
}

/// Register the metadata builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.set("meta", Value::builtin(builtin_meta));
    env.set("with-meta", Value::builtin(builtin_with_meta));
}
