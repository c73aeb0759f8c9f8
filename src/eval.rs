// ABOUTME: Evaluator module executing parsed forms with tail call optimization

use crate::env::Environment;
use crate::error::EvalError;
use crate::printer::pr_str;
use crate::value::{Lambda, Value};
use std::collections::HashMap;
use std::rc::Rc;

/// Main evaluation function. The explicit loop is the tail-call trampoline:
/// special forms that continue in tail position (`if` branches, `let*` and
/// `catch*` bodies, the `do` tail, quasiquote rewrites, closure application)
/// rewrite `ast`/`env` and continue instead of recursing, so arbitrarily
/// deep tail recursion runs in constant Rust stack.
pub fn eval(mut ast: Value, mut env: Rc<Environment>) -> Result<Value, EvalError> {
    loop {
        ast = macroexpand(ast, &env)?;

        let items = match &ast {
            Value::List(items, _) => {
                if items.is_empty() {
                    return Ok(ast.clone());
                }
                Rc::clone(items)
            }
            other => return eval_ast(other, &env),
        };

        let head = match &items[0] {
            Value::Sym(s) => s.as_str(),
            _ => "",
        };

        match head {
            "def!" => {
                let name = binding_symbol(&items, "def!")?;
                let value = eval(items[2].clone(), env.clone())?;
                env.set(name, value.clone());
                return Ok(value);
            }

            "let*" => {
                if items.len() != 3 {
                    return Err(EvalError::Syntax(
                        "let*: expected a binding list and a body".to_string(),
                    ));
                }
                let bindings = items[1].seq_items().ok_or_else(|| {
                    EvalError::type_error("let*", "list or vector of bindings", &items[1], 1)
                })?;
                if bindings.len() % 2 != 0 {
                    return Err(EvalError::Syntax(
                        "let*: expected an even number of binding forms".to_string(),
                    ));
                }
                let child = Environment::with_parent(env.clone());
                for pair in bindings.chunks(2) {
                    let name = match &pair[0] {
                        Value::Sym(s) => s.clone(),
                        other => {
                            return Err(EvalError::type_error("let*", "symbol", other, 1));
                        }
                    };
                    let value = eval(pair[1].clone(), child.clone())?;
                    child.set(name, value);
                }
                env = child;
                ast = items[2].clone();
            }

            "do" => {
                if items.len() == 1 {
                    return Ok(Value::Nil);
                }
                for form in &items[1..items.len() - 1] {
                    eval(form.clone(), env.clone())?;
                }
                ast = items[items.len() - 1].clone();
            }

            "if" => {
                if items.len() < 3 || items.len() > 4 {
                    return Err(EvalError::Syntax(
                        "if: expected a condition, a then branch, and an optional else branch"
                            .to_string(),
                    ));
                }
                let condition = eval(items[1].clone(), env.clone())?;
                if condition.is_truthy() {
                    ast = items[2].clone();
                } else if items.len() == 4 {
                    ast = items[3].clone();
                } else {
                    return Ok(Value::Nil);
                }
            }

            "fn*" => return make_lambda(&items, &env),

            "quote" => {
                if items.len() != 2 {
                    return Err(EvalError::arity_error("quote", "1", items.len() - 1));
                }
                return Ok(items[1].clone());
            }

            "quasiquote" => {
                if items.len() != 2 {
                    return Err(EvalError::arity_error("quasiquote", "1", items.len() - 1));
                }
                ast = quasiquote(&items[1]);
            }

            "defmacro!" => {
                let name = binding_symbol(&items, "defmacro!")?;
                let value = eval(items[2].clone(), env.clone())?;
                let lambda = match &value {
                    Value::Lambda(lambda) => lambda,
                    other => return Err(EvalError::type_error("defmacro!", "function", other, 2)),
                };
                // Flag a copy, never the original closure
                let mac = Value::Lambda(Rc::new(Lambda {
                    is_macro: true,
                    ..(**lambda).clone()
                }));
                env.set(name, mac.clone());
                return Ok(mac);
            }

            "macroexpand" => {
                if items.len() != 2 {
                    return Err(EvalError::arity_error("macroexpand", "1", items.len() - 1));
                }
                return macroexpand(items[1].clone(), &env);
            }

            "try*" => {
                if items.len() < 2 {
                    return Err(EvalError::Syntax("try*: expected a body".to_string()));
                }
                match catch_clause(&items) {
                    None => return eval(items[1].clone(), env.clone()),
                    Some((bind_name, handler)) => match eval(items[1].clone(), env.clone()) {
                        Ok(value) => return Ok(value),
                        Err(err) => {
                            // User throws carry the value; host errors reach
                            // the handler as their string description.
                            let payload = match err {
                                EvalError::Thrown(value) => value,
                                other => Value::Str(other.to_string()),
                            };
                            let child = Environment::with_parent(env.clone());
                            child.set(bind_name, payload);
                            env = child;
                            ast = handler;
                        }
                    },
                }
            }

            _ => {
                // Function application
                let func = eval(items[0].clone(), env.clone())?;
                let mut args = Vec::with_capacity(items.len() - 1);
                for item in &items[1..] {
                    args.push(eval(item.clone(), env.clone())?);
                }
                match func {
                    Value::Builtin(func, _) => return func(&args),
                    Value::Lambda(lambda) => {
                        env = Environment::bind(
                            lambda.env.clone(),
                            &lambda.params,
                            lambda.rest.as_deref(),
                            &args,
                        )?;
                        ast = lambda.body.clone();
                    }
                    other => return Err(EvalError::NotAFunction(pr_str(&other, true))),
                }
            }
        }
    }
}

/// Evaluation of non-list values: symbol lookup, and element-wise
/// evaluation inside vectors and map values. Everything else is itself.
fn eval_ast(ast: &Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    match ast {
        Value::Sym(name) => env.get(name),
        Value::Vector(items, _) => {
            let evaled = items
                .iter()
                .map(|item| eval(item.clone(), env.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::vector(evaled))
        }
        Value::Map(entries, _) => {
            let mut evaled = HashMap::with_capacity(entries.len());
            for (key, val) in entries.iter() {
                evaled.insert(key.clone(), eval(val.clone(), env.clone())?);
            }
            Ok(Value::map(evaled))
        }
        other => Ok(other.clone()),
    }
}

/// Invoke a callable on already-evaluated arguments. Shared by the
/// evaluator's macro expansion and the `map`/`apply`/`swap!` builtins.
pub fn apply(func: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match func {
        Value::Builtin(f, _) => f(args),
        Value::Lambda(lambda) => {
            let env = Environment::bind(
                lambda.env.clone(),
                &lambda.params,
                lambda.rest.as_deref(),
                args,
            )?;
            eval(lambda.body.clone(), env)
        }
        other => Err(EvalError::NotAFunction(pr_str(other, true))),
    }
}

/// Expand macro calls at the head of `ast` until none remain. The macro
/// closure runs on the unevaluated tail and its result replaces the form.
pub fn macroexpand(mut ast: Value, env: &Rc<Environment>) -> Result<Value, EvalError> {
    loop {
        let (mac, args) = match &ast {
            Value::List(items, _) => match items.first() {
                Some(Value::Sym(name)) => match env.lookup(name) {
                    Some(Value::Lambda(lambda)) if lambda.is_macro => {
                        (Value::Lambda(lambda), items[1..].to_vec())
                    }
                    _ => return Ok(ast),
                },
                _ => return Ok(ast),
            },
            _ => return Ok(ast),
        };
        ast = apply(&mac, &args)?;
    }
}

/// Rewrite a quasiquoted form into ordinary code:
///
///   non-sequence F              -> (quote F)
///   (unquote X)                 -> X
///   ((splice-unquote Y) . REST) -> (concat Y (quasiquote REST))
///   (HEAD . REST)               -> (cons (quasiquote HEAD) (quasiquote REST))
///
/// Vectors are rewritten as sequences, so a quasiquoted vector evaluates
/// to a list.
pub fn quasiquote(ast: &Value) -> Value {
    let items = match ast.seq_items() {
        Some(items) if !items.is_empty() => items,
        _ => return Value::list(vec![Value::sym("quote"), ast.clone()]),
    };

    if let Value::Sym(s) = &items[0] {
        if s == "unquote" && items.len() == 2 {
            return items[1].clone();
        }
    }

    let rest = Value::list(items[1..].to_vec());
    if let Some(head_items) = items[0].seq_items() {
        if head_items.len() == 2 && head_items[0] == Value::sym("splice-unquote") {
            return Value::list(vec![
                Value::sym("concat"),
                head_items[1].clone(),
                quasiquote(&rest),
            ]);
        }
    }

    Value::list(vec![
        Value::sym("cons"),
        quasiquote(&items[0]),
        quasiquote(&rest),
    ])
}

/// `(def! name form)` / `(defmacro! name form)` argument validation
fn binding_symbol(items: &[Value], form: &str) -> Result<String, EvalError> {
    if items.len() != 3 {
        return Err(EvalError::arity_error(form, "2", items.len() - 1));
    }
    match &items[1] {
        Value::Sym(name) => Ok(name.clone()),
        other => Err(EvalError::type_error(form, "symbol", other, 1)),
    }
}

/// `(fn* (params...) body)` with `&` rest-binding support
fn make_lambda(items: &[Value], env: &Rc<Environment>) -> Result<Value, EvalError> {
    if items.len() < 3 {
        return Err(EvalError::Syntax(
            "fn*: expected a parameter list and a body".to_string(),
        ));
    }
    let raw_params = items[1]
        .seq_items()
        .ok_or_else(|| EvalError::type_error("fn*", "parameter list", &items[1], 1))?;

    let mut params = Vec::new();
    let mut rest = None;
    let mut iter = raw_params.iter();
    while let Some(param) = iter.next() {
        let name = match param {
            Value::Sym(s) => s.clone(),
            other => return Err(EvalError::type_error("fn*", "symbol", other, 1)),
        };
        if name == "&" {
            match iter.next() {
                Some(Value::Sym(rest_name)) => rest = Some(rest_name.clone()),
                _ => {
                    return Err(EvalError::Syntax(
                        "fn*: expected a symbol after &".to_string(),
                    ))
                }
            }
            break;
        }
        params.push(name);
    }

    Ok(Value::Lambda(Rc::new(Lambda {
        params,
        rest,
        body: items[2].clone(),
        env: env.clone(),
        is_macro: false,
        meta: Value::Nil,
    })))
}

/// `(catch* sym handler)` in the second position of `try*`, if present and
/// well-formed. A malformed clause means the body runs unprotected, as in
/// a bare `(try* expr)`.
fn catch_clause(items: &[Value]) -> Option<(String, Value)> {
    let clause = match items.get(2) {
        Some(Value::List(clause, _)) if clause.len() == 3 => clause,
        _ => return None,
    };
    match (&clause[0], &clause[1]) {
        (Value::Sym(head), Value::Sym(name)) if head == "catch*" => {
            Some((name.clone(), clause[2].clone()))
        }
        _ => None,
    }
}
