use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("object key must not be empty")]
    EmptyKey,

    #[error("object key must be lowercase hex: {0}")]
    NotLowercase(String),

    #[error("invalid hex string: {0}")]
    InvalidHex(String),
}
