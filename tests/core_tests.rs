// ABOUTME: Lisp-level coverage of the core library builtins

use mal::core::base_environment;
use mal::env::Environment;
use mal::eval::eval;
use mal::printer::pr_str;
use mal::reader::read_str;
use std::rc::Rc;

fn setup() -> Rc<Environment> {
    base_environment(&[]).expect("failed to build base environment")
}

fn rep(code: &str, env: &Rc<Environment>) -> Result<String, String> {
    let ast = read_str(code).map_err(|e| e.to_string())?;
    let value = eval(ast, env.clone()).map_err(|e| e.to_string())?;
    Ok(pr_str(&value, true))
}

/// Assert that each (input, expected-printed-output) pair holds
fn check(env: &Rc<Environment>, cases: &[(&str, &str)]) {
    for (input, expected) in cases {
        match rep(input, env) {
            Ok(printed) => assert_eq!(&printed, expected, "input: {}", input),
            Err(e) => panic!("eval of {:?} failed: {}", input, e),
        }
    }
}

#[test]
fn test_arithmetic() {
    let env = setup();
    check(
        &env,
        &[
            ("(+ 1 2 3)", "6"),
            ("(+)", "0"),
            ("(- 10 3 2)", "5"),
            ("(- 5)", "-5"),
            ("(* 2 3 4)", "24"),
            ("(*)", "1"),
            ("(* 5)", "5"),
            ("(/ 20 4)", "5"),
            ("(/ 100 2 5)", "10"),
            ("(/ 1)", "1"),
            ("(/ 5)", "0"),
            ("(/ -7 2)", "-3"),
        ],
    );
    assert!(rep("(/ 1 0)", &env).is_err());
    assert!(rep("(+ 1 \"a\")", &env).is_err());
}

#[test]
fn test_comparisons() {
    let env = setup();
    check(
        &env,
        &[
            ("(< 1 2)", "true"),
            ("(<= 2 2)", "true"),
            ("(> 1 2)", "false"),
            ("(>= 3 2)", "true"),
            ("(= nil nil)", "true"),
            ("(= 2 (+ 1 1))", "true"),
            ("(= \"abc\" \"abc\")", "true"),
            ("(= :a :a)", "true"),
            ("(= 'a 'a)", "true"),
            ("(= (list 1 2) (vector 1 2))", "true"),
            ("(= (list 1) (list 1 2))", "false"),
        ],
    );
    assert!(rep("(< \"a\" \"b\")", &env).is_err());
}

#[test]
fn test_printing_builtins() {
    let env = setup();
    check(
        &env,
        &[
            ("(pr-str \"a\" 1)", "\"\\\"a\\\" 1\""),
            ("(str \"a\" 1 :k)", "\"a1:k\""),
            ("(str)", "\"\""),
            ("(str \"line1\\nline2\")", "\"line1\\nline2\""),
        ],
    );
}

#[test]
fn test_sequence_builtins() {
    let env = setup();
    check(
        &env,
        &[
            ("(list 1 2)", "(1 2)"),
            ("(list? (list))", "true"),
            ("(list? [1])", "false"),
            ("(vector 1 2)", "[1 2]"),
            ("(vector? [1])", "true"),
            ("(sequential? [1])", "true"),
            ("(sequential? \"abc\")", "false"),
            ("(empty? (list))", "true"),
            ("(empty? nil)", "true"),
            ("(empty? [1])", "false"),
            ("(count [1 2 3])", "3"),
            ("(count \"abc\")", "3"),
            ("(cons 1 [2 3])", "(1 2 3)"),
            ("(concat [1] (list 2) [3 4])", "(1 2 3 4)"),
            ("(nth (list 10 20 30) 2)", "30"),
            ("(first nil)", "nil"),
            ("(first (list))", "nil"),
            ("(first [7 8])", "7"),
            ("(rest nil)", "()"),
            ("(rest [7 8])", "(8)"),
            ("(conj (list 1 2) 3 4)", "(4 3 1 2)"),
            ("(conj [1 2] 3 4)", "[1 2 3 4]"),
            ("(seq nil)", "nil"),
            ("(seq (list))", "nil"),
            ("(seq [1 2])", "(1 2)"),
            ("(seq \"ab\")", "(\"a\" \"b\")"),
            ("(seq \"\")", "nil"),
        ],
    );
    assert!(rep("(nth (list 1) 1)", &env).is_err());
    assert!(rep("(nth (list 1) -1)", &env).is_err());
    assert!(rep("(cons 1 nil)", &env).is_err());
}

#[test]
fn test_map_builtins() {
    let env = setup();
    check(
        &env,
        &[
            ("(map? {})", "true"),
            ("(map? [1])", "false"),
            ("(get {:a 1} :a)", "1"),
            ("(get {:a 1} :b)", "nil"),
            ("(get nil :a)", "nil"),
            ("(get {\"s\" 2} \"s\")", "2"),
            ("(contains? {:a 1} :a)", "true"),
            ("(contains? {:a 1} :b)", "false"),
            ("(get (assoc {:a 1} :b 2) :b)", "2"),
            ("(get (dissoc {:a 1 :b 2} :a) :a)", "nil"),
            ("(count (keys {:a 1 :b 2}))", "2"),
            ("(count (vals {:a 1 :b 2}))", "2"),
            ("(get (hash-map :x 9) :x)", "9"),
            ("{:a (+ 1 1)}", "{:a 2}"),
        ],
    );
    assert!(rep("(hash-map :a)", &env).is_err());
    assert!(rep("(hash-map 1 2)", &env).is_err());
}

#[test]
fn test_type_builtins() {
    let env = setup();
    check(
        &env,
        &[
            ("(symbol \"abc\")", "abc"),
            ("(symbol? 'abc)", "true"),
            ("(symbol? :abc)", "false"),
            ("(keyword \"abc\")", ":abc"),
            ("(keyword :abc)", ":abc"),
            ("(keyword? :abc)", "true"),
            ("(keyword? \"abc\")", "false"),
            ("(nil? nil)", "true"),
            ("(nil? false)", "false"),
            ("(true? true)", "true"),
            ("(true? 1)", "false"),
            ("(false? false)", "true"),
            ("(number? 5)", "true"),
            ("(number? \"5\")", "false"),
            ("(string? \"s\")", "true"),
            ("(string? :s)", "false"),
            ("(fn? +)", "true"),
            ("(fn? (fn* (a) a))", "true"),
            ("(fn? 1)", "false"),
            ("(fn? cond)", "false"),
            ("(macro? cond)", "true"),
            ("(macro? +)", "false"),
        ],
    );
}

#[test]
fn test_atom_builtins() {
    let env = setup();
    check(
        &env,
        &[
            ("(def! a (atom 2))", "(atom 2)"),
            ("(atom? a)", "true"),
            ("(atom? 1)", "false"),
            ("@a", "2"),
            ("(reset! a 3)", "3"),
            ("(deref a)", "3"),
            ("(swap! a + 4)", "7"),
            ("@a", "7"),
        ],
    );
}

#[test]
fn test_read_string_builtin() {
    let env = setup();
    check(
        &env,
        &[
            ("(read-string \"(1 2 (3 4) nil)\")", "(1 2 (3 4) nil)"),
            ("(read-string \"7 ;; comment\")", "7"),
            ("(eval (read-string \"(+ 2 3)\"))", "5"),
        ],
    );
    assert!(rep("(read-string \"(1\")", &env).is_err());
    // reader errors are host errors: catchable as strings
    check(
        &env,
        &[(
            "(try* (read-string \"(1\") (catch* e (string? e)))",
            "true",
        )],
    );
}

#[test]
fn test_not_from_prelude() {
    let env = setup();
    check(
        &env,
        &[
            ("(not true)", "false"),
            ("(not false)", "true"),
            ("(not nil)", "true"),
            ("(not 0)", "false"),
        ],
    );
}
