//! Error types for formula parsing and evaluation.

use thiserror::Error;

/// Errors raised while tokenizing, converting, building or evaluating a formula.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Unrecognized token: {0}")]
    UnrecognizedToken(String),

    #[error("Mismatched parentheses")]
    MismatchedParentheses,

    #[error("Malformed expression")]
    MalformedExpression,

    #[error("Variable {0} has no value")]
    UnboundVariable(String),

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(char),

    #[error("Division by zero")]
    DivideByZero,

    #[error("Invalid cell reference: {0}")]
    InvalidCellReference(String),
}

pub type FormulaResult<T> = std::result::Result<T, FormulaError>;
