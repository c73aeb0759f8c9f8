// ABOUTME: Value types representing Mal data structures and expressions

use crate::env::Environment;
use crate::error::EvalError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Signature shared by every built-in function.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, EvalError>;

/// The runtime value type. Lists, vectors, and maps double as AST nodes;
/// the reader produces `Value`s and the evaluator consumes them.
///
/// Collections and callables carry metadata (`nil` by default) in a shared
/// slot so `with-meta` copies are cheap.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    Sym(String),
    Kw(String), // stored without the leading colon
    List(Rc<Vec<Value>>, Rc<Value>),
    Vector(Rc<Vec<Value>>, Rc<Value>),
    Map(Rc<HashMap<MapKey, Value>>, Rc<Value>),
    Builtin(BuiltinFn, Rc<Value>),
    Lambda(Rc<Lambda>),
    Atom(Rc<RefCell<Value>>),
}

/// A user-defined closure. `is_macro` distinguishes macros; they are still
/// callable (macroexpand applies them like any other closure).
#[derive(Debug, Clone)]
pub struct Lambda {
    pub params: Vec<String>,
    pub rest: Option<String>,
    pub body: Value,
    pub env: Rc<Environment>,
    pub is_macro: bool,
    pub meta: Value,
}

/// Hash-map keys are restricted to symbols, keywords, and strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    Sym(String),
    Kw(String),
    Str(String),
}

impl MapKey {
    pub fn from_value(value: &Value) -> Option<MapKey> {
        match value {
            Value::Sym(s) => Some(MapKey::Sym(s.clone())),
            Value::Kw(k) => Some(MapKey::Kw(k.clone())),
            Value::Str(s) => Some(MapKey::Str(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Sym(s) => Value::Sym(s.clone()),
            MapKey::Kw(k) => Value::Kw(k.clone()),
            MapKey::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(items), Rc::new(Value::Nil))
    }

    pub fn vector(items: Vec<Value>) -> Value {
        Value::Vector(Rc::new(items), Rc::new(Value::Nil))
    }

    pub fn map(entries: HashMap<MapKey, Value>) -> Value {
        Value::Map(Rc::new(entries), Rc::new(Value::Nil))
    }

    pub fn builtin(func: BuiltinFn) -> Value {
        Value::Builtin(func, Rc::new(Value::Nil))
    }

    pub fn sym(name: &str) -> Value {
        Value::Sym(name.to_string())
    }

    pub fn atom(value: Value) -> Value {
        Value::Atom(Rc::new(RefCell::new(value)))
    }

    /// Everything except `nil` and `false` is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// The elements of a list or vector, viewed uniformly.
    pub fn seq_items(&self) -> Option<&[Value]> {
        match self {
            Value::List(items, _) | Value::Vector(items, _) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Sym(_) => "symbol",
            Value::Kw(_) => "keyword",
            Value::List(..) => "list",
            Value::Vector(..) => "vector",
            Value::Map(..) => "map",
            Value::Builtin(..) | Value::Lambda(_) => "function",
            Value::Atom(_) => "atom",
        }
    }
}

/// Structural equality as exposed by `=`. Lists and vectors compare
/// sequence-equal across kinds; atoms compare by cell identity; callables
/// compare by identity. Metadata never participates.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Sym(a), Value::Sym(b)) => a == b,
            (Value::Kw(a), Value::Kw(b)) => a == b,
            (Value::List(a, _) | Value::Vector(a, _), Value::List(b, _) | Value::Vector(b, _)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (Value::Map(a, _), Value::Map(b, _)) => a == b,
            (Value::Builtin(a, _), Value::Builtin(b, _)) => *a == *b,
            (Value::Lambda(a), Value::Lambda(b)) => Rc::ptr_eq(a, b),
            (Value::Atom(a), Value::Atom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::printer::pr_str(self, true))
    }
}
