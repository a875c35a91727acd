//! Error types for quantity parsing.

use thiserror::Error;

/// Result type alias for quantity parsing.
pub type QuantityResult<T> = Result<T, QuantityError>;

/// Errors that can occur while parsing a resource quantity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuantityError {
    #[error("empty quantity")]
    Empty,

    #[error("invalid quantity number: {0:?}")]
    InvalidNumber(String),

    #[error("invalid quantity suffix: {0:?}")]
    InvalidSuffix(String),

    #[error("quantity out of range: {0:?}")]
    Overflow(String),
}
