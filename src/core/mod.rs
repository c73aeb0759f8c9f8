//! # Core Library
//!
//! Built-in functions bound in the root environment, organized by category:
//!
//! - **[arithmetic]** (4): +, -, *, / — Integer operations
//! - **[comparison]** (5): =, <, <=, >, >= — Value comparisons
//! - **[console]** (4): pr-str, str, prn, println — Printing
//! - **[lists]** (16): list, vector, cons, concat, nth, first, rest, map,
//!   apply, conj, seq, count, empty?, and the sequence predicates
//! - **[maps]** (8): hash-map, assoc, dissoc, get, contains?, keys, vals, map?
//! - **[types]** (11): symbol, keyword, and the type predicates
//! - **[atoms]** (5): atom, atom?, deref, reset!, swap!
//! - **[io]** (4): read-string, slurp, readline, time-ms
//! - **[errors]** (1): throw
//! - **[meta]** (2): meta, with-meta
//!
//! [`base_environment`] builds the complete root environment: the
//! categories above plus `eval`, `*ARGV*`, and the in-language prelude
//! (`*host-language*`, `not`, `load-file`, `cond`).

use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::eval;
use crate::reader::read_str;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

pub mod arithmetic;
pub mod atoms;
pub mod comparison;
pub mod console;
pub mod errors;
pub mod io;
pub mod lists;
pub mod maps;
pub mod meta;
pub mod types;

// ============================================================================
// Root Environment Storage for the `eval` Built-in
// ============================================================================

thread_local! {
    static ROOT_ENV: RefCell<Option<Rc<Environment>>> = const { RefCell::new(None) };
}

/// Remember the root environment so `eval` can reach it. The language
/// requires `eval` to run in the root environment regardless of the
/// caller's scope.
pub fn set_root_env(env: Rc<Environment>) {
    ROOT_ENV.with(|slot| {
        *slot.borrow_mut() = Some(env);
    });
}

fn root_env() -> Result<Rc<Environment>, EvalError> {
    ROOT_ENV.with(|slot| {
        slot.borrow()
            .clone()
            .ok_or_else(|| EvalError::runtime_error("eval", "root environment is not initialized"))
    })
}

/// Evaluate a form in the root environment
pub fn builtin_eval(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("eval", "1", args.len()));
    }
    eval(args[0].clone(), root_env()?)
}

// ============================================================================
// Registration & Bootstrap
// ============================================================================

/// Register every core category in the environment
pub fn register_core(env: &Rc<Environment>) {
    arithmetic::register(env);
    comparison::register(env);
    console::register(env);
    lists::register(env);
    maps::register(env);
    types::register(env);
    atoms::register(env);
    io::register(env);
    errors::register(env);
    meta::register(env);
}

/// Forms evaluated at startup; definitions the language hosts itself.
const PRELUDE: &[&str] = &[
    r#"(def! *host-language* "rust")"#,
    "(def! not (fn* (a) (if a false true)))",
    r#"(def! load-file (fn* (f) (eval (read-string (str "(do " (slurp f) "\nnil)")))))"#,
    r#"(defmacro! cond (fn* (& xs) (if (> (count xs) 0) (list 'if (first xs) (if (> (count xs) 1) (nth xs 1) (throw "odd number of forms to cond")) (cons 'cond (rest (rest xs)))))))"#,
];

/// Build a complete root environment: core namespace, `eval`, `*ARGV*`,
/// and the prelude.
pub fn base_environment(argv: &[String]) -> Result<Rc<Environment>, EvalError> {
    let env = Environment::new();
    register_core(&env);
    env.set("eval", Value::builtin(builtin_eval));
    env.set(
        "*ARGV*",
        Value::list(argv.iter().map(|arg| Value::Str(arg.clone())).collect()),
    );
    set_root_env(env.clone());

    for form in PRELUDE {
        let ast = read_str(form).map_err(|e| EvalError::Syntax(e.to_string()))?;
        eval(ast, env.clone())?;
    }
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_str(src: &str, env: &Rc<Environment>) -> Result<Value, EvalError> {
        eval(read_str(src).unwrap(), env.clone())
    }

    #[test]
    fn test_base_environment_has_core_and_prelude() {
        let env = base_environment(&[]).unwrap();
        assert_eq!(
            eval_str("*host-language*", &env).unwrap(),
            Value::Str("rust".into())
        );
        assert_eq!(eval_str("(not nil)", &env).unwrap(), Value::Bool(true));
        assert_eq!(eval_str("(not 1)", &env).unwrap(), Value::Bool(false));
        assert!(env.lookup("load-file").is_some());
    }

    #[test]
    fn test_argv_exposed_as_list() {
        let env = base_environment(&["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(
            eval_str("*ARGV*", &env).unwrap(),
            Value::list(vec![Value::Str("a".into()), Value::Str("b".into())])
        );
    }

    #[test]
    fn test_eval_builtin_runs_in_root_env() {
        let env = base_environment(&[]).unwrap();
        // a local binding must be invisible to eval
        eval_str("(def! x 1)", &env).unwrap();
        assert_eq!(
            eval_str("(let* (x 99) (eval (read-string \"x\")))", &env).unwrap(),
            Value::Int(1)
        );
    }

    #[test]
    fn test_cond_macro() {
        let env = base_environment(&[]).unwrap();
        assert_eq!(
            eval_str("(cond false 1 true 2 true 3)", &env).unwrap(),
            Value::Int(2)
        );
        assert_eq!(eval_str("(cond false 1)", &env).unwrap(), Value::Nil);
        assert!(matches!(
            eval_str("(cond true)", &env),
            Err(EvalError::Thrown(_))
        ));
    }
}
