//! Sequence operations: list, vector, cons, concat, nth, first, rest,
//! map, apply, conj, seq, and the associated predicates.
//!
//! Sequences are immutable; every operation returns a fresh value and
//! list/vector inputs are accepted interchangeably unless noted.

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval;
use crate::value::Value;
use std::rc::Rc;

fn seq_arg<'a>(function: &str, args: &'a [Value], position: usize) -> Result<&'a [Value], EvalError> {
    args[position].seq_items().ok_or_else(|| {
        EvalError::type_error(function, "list or vector", &args[position], position + 1)
    })
}

fn check_arity(function: &str, expected: usize, args: &[Value]) -> Result<(), EvalError> {
    if args.len() != expected {
        return Err(EvalError::arity_error(
            function,
            expected.to_string(),
            args.len(),
        ));
    }
    Ok(())
}

/// Creates a new list containing the given elements in order
pub fn builtin_list(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::list(args.to_vec()))
}

pub fn builtin_list_q(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("list?", 1, args)?;
    Ok(Value::Bool(matches!(args[0], Value::List(..))))
}

/// Creates a new vector containing the given elements in order
pub fn builtin_vector(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::vector(args.to_vec()))
}

pub fn builtin_vector_q(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("vector?", 1, args)?;
    Ok(Value::Bool(matches!(args[0], Value::Vector(..))))
}

/// True for lists and vectors alike
pub fn builtin_sequential_q(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("sequential?", 1, args)?;
    Ok(Value::Bool(args[0].seq_items().is_some()))
}

/// Tests whether a sequence, string, or nil is empty
pub fn builtin_empty_q(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("empty?", 1, args)?;
    match &args[0] {
        Value::Nil => Ok(Value::Bool(true)),
        Value::Str(s) => Ok(Value::Bool(s.is_empty())),
        other => {
            let items = other
                .seq_items()
                .ok_or_else(|| EvalError::type_error("empty?", "sequence", other, 1))?;
            Ok(Value::Bool(items.is_empty()))
        }
    }
}

/// Number of elements; nil counts as 0, strings count characters
pub fn builtin_count(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("count", 1, args)?;
    match &args[0] {
        Value::Nil => Ok(Value::Int(0)),
        Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
        other => {
            let items = other
                .seq_items()
                .ok_or_else(|| EvalError::type_error("count", "sequence", other, 1))?;
            Ok(Value::Int(items.len() as i64))
        }
    }
}

/// Prepends an element, always producing a list
pub fn builtin_cons(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("cons", 2, args)?;
    let tail = seq_arg("cons", args, 1)?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(tail);
    Ok(Value::list(items))
}

/// Concatenates any number of sequences into a list; `(concat)` is `()`
pub fn builtin_concat(args: &[Value]) -> Result<Value, EvalError> {
    let mut items = Vec::new();
    for position in 0..args.len() {
        items.extend_from_slice(seq_arg("concat", args, position)?);
    }
    Ok(Value::list(items))
}

/// Indexing with an out-of-range error (negative indexes included)
pub fn builtin_nth(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("nth", 2, args)?;
    let items = seq_arg("nth", args, 0)?;
    let index = match &args[1] {
        Value::Int(n) => *n,
        other => return Err(EvalError::type_error("nth", "int", other, 2)),
    };
    if index < 0 || index as usize >= items.len() {
        return Err(EvalError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(items[index as usize].clone())
}

/// First element; nil or an empty sequence gives nil
pub fn builtin_first(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("first", 1, args)?;
    if matches!(args[0], Value::Nil) {
        return Ok(Value::Nil);
    }
    let items = seq_arg("first", args, 0)?;
    Ok(items.first().cloned().unwrap_or(Value::Nil))
}

/// Everything after the first element; nil or an empty sequence gives `()`
pub fn builtin_rest(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("rest", 1, args)?;
    if matches!(args[0], Value::Nil) {
        return Ok(Value::list(vec![]));
    }
    let items = seq_arg("rest", args, 0)?;
    if items.is_empty() {
        return Ok(Value::list(vec![]));
    }
    Ok(Value::list(items[1..].to_vec()))
}

/// Applies a function to each element, returning a list
pub fn builtin_map(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("map", 2, args)?;
    let items = seq_arg("map", args, 1)?;
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(eval::apply(&args[0], std::slice::from_ref(item))?);
    }
    Ok(Value::list(mapped))
}

/// Calls a function with leading arguments plus a final sequence, splatted
pub fn builtin_apply(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("apply", "at least 2", args.len()));
    }
    let spread = seq_arg("apply", args, args.len() - 1)?;
    let mut call_args = args[1..args.len() - 1].to_vec();
    call_args.extend_from_slice(spread);
    eval::apply(&args[0], &call_args)
}

/// Adds elements to a collection: prepended one by one onto a list,
/// appended in order onto a vector
pub fn builtin_conj(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("conj", "at least 1", 0));
    }
    match &args[0] {
        Value::List(items, _) => {
            let mut joined: Vec<Value> = args[1..].iter().rev().cloned().collect();
            joined.extend_from_slice(items);
            Ok(Value::list(joined))
        }
        Value::Vector(items, _) => {
            let mut joined = items.as_slice().to_vec();
            joined.extend_from_slice(&args[1..]);
            Ok(Value::vector(joined))
        }
        other => Err(EvalError::type_error("conj", "list or vector", other, 1)),
    }
}

/// Normalizes to a list: nil and empties give nil, vectors become lists,
/// strings become lists of one-character strings
pub fn builtin_seq(args: &[Value]) -> Result<Value, EvalError> {
    check_arity("seq", 1, args)?;
    match &args[0] {
        Value::Nil => Ok(Value::Nil),
        Value::Str(s) => {
            if s.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(Value::list(
                    s.chars().map(|c| Value::Str(c.to_string())).collect(),
                ))
            }
        }
        Value::List(items, _) => {
            if items.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(args[0].clone())
            }
        }
        Value::Vector(items, _) => {
            if items.is_empty() {
                Ok(Value::Nil)
            } else {
                Ok(Value::list(items.as_slice().to_vec()))
            }
        }
        other => Err(EvalError::type_error(
            "seq",
            "list, vector, string, or nil",
            other,
            1,
        )),
    }
}

/// Register all sequence builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.set("list", Value::builtin(builtin_list));
    env.set("list?", Value::builtin(builtin_list_q));
    env.set("vector", Value::builtin(builtin_vector));
    env.set("vector?", Value::builtin(builtin_vector_q));
    env.set("sequential?", Value::builtin(builtin_sequential_q));
    env.set("empty?", Value::builtin(builtin_empty_q));
    env.set("count", Value::builtin(builtin_count));
    env.set("cons", Value::builtin(builtin_cons));
    env.set("concat", Value::builtin(builtin_concat));
    env.set("nth", Value::builtin(builtin_nth));
    env.set("first", Value::builtin(builtin_first));
    env.set("rest", Value::builtin(builtin_rest));
    env.set("map", Value::builtin(builtin_map));
    env.set("apply", Value::builtin(builtin_apply));
    env.set("conj", Value::builtin(builtin_conj));
    env.set("seq", Value::builtin(builtin_seq));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(ns: &[i64]) -> Vec<Value> {
        ns.iter().map(|n| Value::Int(*n)).collect()
    }

    #[test]
    fn test_list_and_predicates() {
        let list = builtin_list(&ints(&[1, 2])).unwrap();
        assert_eq!(builtin_list_q(&[list.clone()]).unwrap(), Value::Bool(true));
        assert_eq!(builtin_vector_q(&[list.clone()]).unwrap(), Value::Bool(false));
        assert_eq!(
            builtin_sequential_q(&[list]).unwrap(),
            Value::Bool(true)
        );

        let vector = builtin_vector(&ints(&[1])).unwrap();
        assert_eq!(builtin_vector_q(&[vector.clone()]).unwrap(), Value::Bool(true));
        assert_eq!(builtin_list_q(&[vector]).unwrap(), Value::Bool(false));
        assert_eq!(
            builtin_sequential_q(&[Value::Int(1)]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_empty_and_count() {
        assert_eq!(builtin_empty_q(&[Value::Nil]).unwrap(), Value::Bool(true));
        assert_eq!(
            builtin_empty_q(&[Value::list(vec![])]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            builtin_empty_q(&[Value::list(ints(&[1]))]).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(builtin_count(&[Value::Nil]).unwrap(), Value::Int(0));
        assert_eq!(
            builtin_count(&[Value::list(ints(&[1, 2, 3]))]).unwrap(),
            Value::Int(3)
        );
        assert_eq!(
            builtin_count(&[Value::Str("abc".into())]).unwrap(),
            Value::Int(3)
        );
    }

    #[test]
    fn test_cons() {
        assert_eq!(
            builtin_cons(&[Value::Int(1), Value::list(ints(&[2, 3]))]).unwrap(),
            Value::list(ints(&[1, 2, 3]))
        );
        // consing onto a vector still yields a list
        assert_eq!(
            builtin_cons(&[Value::Int(1), Value::vector(ints(&[2]))]).unwrap(),
            Value::list(ints(&[1, 2]))
        );
        assert!(builtin_cons(&[Value::Int(1), Value::Nil]).is_err());
    }

    #[test]
    fn test_concat() {
        assert_eq!(builtin_concat(&[]).unwrap(), Value::list(vec![]));
        assert_eq!(
            builtin_concat(&[
                Value::list(ints(&[1, 2])),
                Value::vector(ints(&[3])),
                Value::list(vec![]),
            ])
            .unwrap(),
            Value::list(ints(&[1, 2, 3]))
        );
    }

    #[test]
    fn test_nth() {
        let list = Value::list(ints(&[10, 20, 30]));
        assert_eq!(
            builtin_nth(&[list.clone(), Value::Int(1)]).unwrap(),
            Value::Int(20)
        );
        assert!(matches!(
            builtin_nth(&[list.clone(), Value::Int(3)]),
            Err(EvalError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            builtin_nth(&[list, Value::Int(-1)]),
            Err(EvalError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_first_and_rest() {
        assert_eq!(builtin_first(&[Value::Nil]).unwrap(), Value::Nil);
        assert_eq!(
            builtin_first(&[Value::list(vec![])]).unwrap(),
            Value::Nil
        );
        assert_eq!(
            builtin_first(&[Value::list(ints(&[7, 8]))]).unwrap(),
            Value::Int(7)
        );

        assert_eq!(builtin_rest(&[Value::Nil]).unwrap(), Value::list(vec![]));
        assert_eq!(
            builtin_rest(&[Value::list(ints(&[7, 8]))]).unwrap(),
            Value::list(ints(&[8]))
        );
        assert_eq!(
            builtin_rest(&[Value::vector(ints(&[7]))]).unwrap(),
            Value::list(vec![])
        );
    }

    #[test]
    fn test_conj() {
        assert_eq!(
            builtin_conj(&[Value::list(ints(&[1, 2])), Value::Int(3), Value::Int(4)]).unwrap(),
            Value::list(ints(&[4, 3, 1, 2]))
        );
        assert_eq!(
            builtin_conj(&[Value::vector(ints(&[1, 2])), Value::Int(3), Value::Int(4)]).unwrap(),
            Value::vector(ints(&[1, 2, 3, 4]))
        );
    }

    #[test]
    fn test_seq() {
        assert_eq!(builtin_seq(&[Value::Nil]).unwrap(), Value::Nil);
        assert_eq!(builtin_seq(&[Value::list(vec![])]).unwrap(), Value::Nil);
        assert_eq!(builtin_seq(&[Value::Str(String::new())]).unwrap(), Value::Nil);
        assert_eq!(
            builtin_seq(&[Value::vector(ints(&[1, 2]))]).unwrap(),
            Value::list(ints(&[1, 2]))
        );
        assert_eq!(
            builtin_seq(&[Value::Str("ab".into())]).unwrap(),
            Value::list(vec![Value::Str("a".into()), Value::Str("b".into())])
        );
    }

    #[test]
    fn test_map_and_apply_with_builtins() {
        let double = |args: &[Value]| -> Result<Value, EvalError> {
            match &args[0] {
                Value::Int(n) => Ok(Value::Int(n * 2)),
                other => Err(EvalError::type_error("double", "int", other, 1)),
            }
        };
        let func = Value::builtin(double);

        assert_eq!(
            builtin_map(&[func.clone(), Value::list(ints(&[1, 2, 3]))]).unwrap(),
            Value::list(ints(&[2, 4, 6]))
        );

        let add = Value::builtin(crate::core::arithmetic::builtin_add);
        assert_eq!(
            builtin_apply(&[add, Value::Int(1), Value::list(ints(&[2, 3]))]).unwrap(),
            Value::Int(6)
        );
    }
}
