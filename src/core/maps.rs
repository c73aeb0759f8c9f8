//! Hash-map operations: hash-map, map?, assoc, dissoc, get, contains?,
//! keys, vals
//!
//! Maps are immutable; assoc and dissoc return fresh maps. Keys are
//! restricted to symbols, keywords, and strings.

use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{MapKey, Value};
use std::collections::HashMap;
use std::rc::Rc;

fn map_arg<'a>(
    function: &str,
    args: &'a [Value],
    position: usize,
) -> Result<&'a HashMap<MapKey, Value>, EvalError> {
    match &args[position] {
        Value::Map(entries, _) => Ok(entries),
        other => Err(EvalError::type_error(function, "map", other, position + 1)),
    }
}

fn key_arg(function: &str, args: &[Value], position: usize) -> Result<MapKey, EvalError> {
    MapKey::from_value(&args[position]).ok_or_else(|| {
        EvalError::type_error(
            function,
            "symbol, keyword, or string",
            &args[position],
            position + 1,
        )
    })
}

fn insert_pairs(
    function: &str,
    entries: &mut HashMap<MapKey, Value>,
    pairs: &[Value],
) -> Result<(), EvalError> {
    if pairs.len() % 2 != 0 {
        return Err(EvalError::arity_error(
            function,
            "an even number of",
            pairs.len(),
        ));
    }
    for (position, pair) in pairs.chunks(2).enumerate() {
        let key = MapKey::from_value(&pair[0]).ok_or_else(|| {
            EvalError::type_error(
                function,
                "symbol, keyword, or string",
                &pair[0],
                position * 2 + 1,
            )
        })?;
        entries.insert(key, pair[1].clone());
    }
    Ok(())
}

/// Builds a map from alternating keys and values
pub fn builtin_hash_map(args: &[Value]) -> Result<Value, EvalError> {
    let mut entries = HashMap::new();
    insert_pairs("hash-map", &mut entries, args)?;
    Ok(Value::map(entries))
}

pub fn builtin_map_q(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("map?", "1", args.len()));
    }
    Ok(Value::Bool(matches!(args[0], Value::Map(..))))
}

/// Returns a copy of the map with the given pairs added or replaced
pub fn builtin_assoc(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("assoc", "at least 1", 0));
    }
    let mut entries = map_arg("assoc", args, 0)?.clone();
    insert_pairs("assoc", &mut entries, &args[1..])?;
    Ok(Value::map(entries))
}

/// Returns a copy of the map with the given keys removed
pub fn builtin_dissoc(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::arity_error("dissoc", "at least 1", 0));
    }
    let mut entries = map_arg("dissoc", args, 0)?.clone();
    for position in 1..args.len() {
        entries.remove(&key_arg("dissoc", args, position)?);
    }
    Ok(Value::map(entries))
}

/// Looks up a key; nil-safe on the map and nil on a missing key
pub fn builtin_get(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("get", "2", args.len()));
    }
    if matches!(args[0], Value::Nil) {
        return Ok(Value::Nil);
    }
    let entries = map_arg("get", args, 0)?;
    let key = key_arg("get", args, 1)?;
    Ok(entries.get(&key).cloned().unwrap_or(Value::Nil))
}

pub fn builtin_contains_q(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("contains?", "2", args.len()));
    }
    let entries = map_arg("contains?", args, 0)?;
    let key = key_arg("contains?", args, 1)?;
    Ok(Value::Bool(entries.contains_key(&key)))
}

/// The map's keys as a list
pub fn builtin_keys(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("keys", "1", args.len()));
    }
    let entries = map_arg("keys", args, 0)?;
    Ok(Value::list(entries.keys().map(MapKey::to_value).collect()))
}

/// The map's values as a list
pub fn builtin_vals(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("vals", "1", args.len()));
    }
    let entries = map_arg("vals", args, 0)?;
    Ok(Value::list(entries.values().cloned().collect()))
}

/// Register all map builtins in the environment
pub fn register(env: &Rc<Environment>) {
    env.set("hash-map", Value::builtin(builtin_hash_map));
    env.set("map?", Value::builtin(builtin_map_q));
    env.set("assoc", Value::builtin(builtin_assoc));
    env.set("dissoc", Value::builtin(builtin_dissoc));
    env.set("get", Value::builtin(builtin_get));
    env.set("contains?", Value::builtin(builtin_contains_q));
    env.set("keys", Value::builtin(builtin_keys));
    env.set("vals", Value::builtin(builtin_vals));
}
