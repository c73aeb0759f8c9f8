// ABOUTME: Environment module for managing variable bindings and scopes

use crate::error::EvalError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A single scope: its own bindings plus a link to the enclosing scope.
/// Environments form a tree rooted at the global scope; children only point
/// at parents, so reference counting suffices.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    /// Creates a new global environment with no parent
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// Creates a new child environment with a parent
    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Binds a name in THIS scope (doesn't walk the parent chain)
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Looks up a symbol in this scope and parent scopes recursively
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    /// The nearest scope whose own bindings contain `name`, if any
    pub fn find(self: &Rc<Self>, name: &str) -> Option<Rc<Environment>> {
        if self.bindings.borrow().contains_key(name) {
            Some(Rc::clone(self))
        } else {
            self.parent.as_ref().and_then(|parent| parent.find(name))
        }
    }

    /// Like `lookup`, but an unbound symbol is an error
    pub fn get(&self, name: &str) -> Result<Value, EvalError> {
        self.lookup(name)
            .ok_or_else(|| EvalError::SymbolNotFound(name.to_string()))
    }

    /// Builds a call frame under `parent`: positional parameters paired with
    /// arguments, and the rest parameter (if any) bound to a list of the
    /// leftovers. Surplus arguments without a rest parameter are an error,
    /// as is a shortfall.
    pub fn bind(
        parent: Rc<Environment>,
        params: &[String],
        rest: Option<&str>,
        args: &[Value],
    ) -> Result<Rc<Environment>, EvalError> {
        if args.len() < params.len() || (rest.is_none() && args.len() > params.len()) {
            let expected = if rest.is_some() {
                format!("at least {}", params.len())
            } else {
                params.len().to_string()
            };
            return Err(EvalError::arity_error("fn*", expected, args.len()));
        }

        let env = Environment::with_parent(parent);
        for (param, arg) in params.iter().zip(args.iter()) {
            env.set(param.clone(), arg.clone());
        }
        if let Some(rest_name) = rest {
            env.set(rest_name, Value::list(args[params.len()..].to_vec()));
        }
        Ok(env)
    }
}
