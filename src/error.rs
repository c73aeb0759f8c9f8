// ABOUTME: Error types for evaluation failures in the Mal interpreter

use crate::value::Value;
use thiserror::Error;

/// Errors raised during evaluation. `Thrown` carries a user value raised by
/// `throw` and is the only variant `catch*` hands back verbatim; every other
/// variant reaches a handler as its string description.
#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// Type mismatch with function name, expected type, actual type, and position
    #[error("{function}: expected {expected}, got {actual} at argument {position}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
        position: usize,
    },

    /// Arity error with function name, expected count/range, and actual count
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    Arity {
        function: String,
        expected: String, // "2", "1-2", "at least 1"
        actual: usize,
    },

    #[error("'{0}' not found")]
    SymbolNotFound(String),

    #[error("'{0}' is not a function")]
    NotAFunction(String),

    #[error("{0}")]
    Syntax(String),

    #[error("nth: index {index} out of range for sequence of length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("{function}: {message}")]
    Runtime { function: String, message: String },

    #[error("{}", crate::printer::pr_str(.0, true))]
    Thrown(Value),
}

impl EvalError {
    /// Create a type mismatch error with full context
    pub fn type_error(function: &str, expected: &str, actual: &Value, position: usize) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
            position,
        }
    }

    /// Create an arity error with expected and actual counts
    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::Arity {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a runtime error with function context
    pub fn runtime_error(function: &str, message: impl Into<String>) -> Self {
        EvalError::Runtime {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
