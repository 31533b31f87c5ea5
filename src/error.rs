use crate::symbolic::parse_expr::ParseError;
use thiserror::Error;

/// Errors surfaced to users of the calculator.
#[derive(Error, Debug)]
pub enum CalcError {
    /// the text is not a valid expression, or has more than one free variable
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),
    /// the value is not a constant, or lies outside the domain of the function
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("No function to plot")]
    NoFunction,
    /// malformed menu selection, order or interval
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Plot error: {0}")]
    Plot(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ParseError> for CalcError {
    fn from(err: ParseError) -> Self {
        CalcError::InvalidExpression(err.to_string())
    }
}

pub type CalcResult<T> = Result<T, CalcError>;
