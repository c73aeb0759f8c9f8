//! Type predicates and constructors: symbol, keyword, nil?, true?,
//! false?, number?, string?, symbol?, keyword?, fn?, macro?
//!
//! `fn?` is true for anything callable that is not a macro; `macro?` picks
//! out flagged closures.

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::Value;
use std::rc::Rc;

fn one_arg<'a>(function: &str, args: &'a [Value]) -> Result<&'a Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error(function, "1", args.len()));
    }
    Ok(&args[0])
}

/// Interns a string as a symbol
pub fn builtin_symbol(args: &[Value]) -> Result<Value, EvalError> {
    match one_arg("symbol", args)? {
        Value::Str(s) => Ok(Value::Sym(s.clone())),
        other => Err(EvalError::type_error("symbol", "string", other, 1)),
    }
}

pub fn builtin_symbol_q(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(
        one_arg("symbol?", args)?,
        Value::Sym(_)
    )))
}

/// Interns a string as a keyword; idempotent on keywords
pub fn builtin_keyword(args: &[Value]) -> Result<Value, EvalError> {
    match one_arg("keyword", args)? {
        Value::Str(s) => Ok(Value::Kw(s.clone())),
        kw @ Value::Kw(_) => Ok(kw.clone()),
        other => Err(EvalError::type_error("keyword", "string or keyword", other, 1)),
    }
}

pub fn builtin_keyword_q(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(
        one_arg("keyword?", args)?,
        Value::Kw(_)
    )))
}

pub fn builtin_nil_q(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg("nil?", args)?, Value::Nil)))
}

pub fn builtin_true_q(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(
        one_arg("true?", args)?,
        Value::Bool(true)
    )))
}

pub fn builtin_false_q(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(
        one_arg("false?", args)?,
        Value::Bool(false)
    )))
}

pub fn builtin_number_q(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg("number?", args)?, Value::Int(_))))
}

pub fn builtin_string_q(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Bool(matches!(one_arg("string?", args)?, Value::Str(_))))
}

/// Callable and not a macro
pub fn builtin_fn_q(args: &[Value]) -> Result<Value, EvalError> {
    let result = match one_arg("fn?", args)? {
        Value::Builtin(..) => true,
        Value::Lambda(lambda) => !lambda.is_macro,
        _ => false,
    };
    Ok(Value::Bool(result))
}

pub fn builtin_macro_q(args: &[Value]) -> Result<Value, EvalError> {
    let result = match one_arg("macro?", args)? {
        Value::Lambda(lambda) => lambda.is_macro,
        _ => false,
    };
    Ok(Value::Bool(result))
}

/// Register all type builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.set("symbol", Value::builtin(builtin_symbol));
    env.set("symbol?", Value::builtin(builtin_symbol_q));
    env.set("keyword", Value::builtin(builtin_keyword));
    env.set("keyword?", Value::builtin(builtin_keyword_q));
    env.set("nil?", Value::builtin(builtin_nil_q));
    env.set("true?", Value::builtin(builtin_true_q));
    env.set("false?", Value::builtin(builtin_false_q));
    env.set("number?", Value::builtin(builtin_number_q));
    env.set("string?", Value::builtin(builtin_string_q));
    env.set("fn?", Value::builtin(builtin_fn_q));
    env.set("macro?", Value::builtin(builtin_macro_q));
}
