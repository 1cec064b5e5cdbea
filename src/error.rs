use crate::rule::Value;
use thiserror::Error;

/// Errors surfaced by the external template and field-metadata stores.
///
/// These never cross the resolution boundary: the resolver and repository catch
/// them, log them, and degrade to the not-found shape (`None` / empty list).
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Store unreachable: {0}")]
    Unavailable(String),

    #[error("Malformed store response: {0}")]
    Malformed(String),
}

/// Errors that can occur while compiling a conditional rule expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleParseError {
    #[error("Failed to parse rule expression '{expression}': {message}")]
    Syntax { expression: String, message: String },

    #[error("Rule expression is empty")]
    Empty,
}

/// Errors that can occur during conditional rule evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error(
        "Type mismatch during operation '{operation}': expected {expected}, but found value '{found}'"
    )]
    TypeMismatch {
        operation: String,
        expected: String,
        found: Value,
    },

    #[error("Field '{0}' not found in the current form state")]
    FieldNotFound(String),
}
