use thiserror::Error;

/// Shared lightweight error type for core primitive operations.
#[derive(Debug, Error, PartialEq)]
pub enum ArenaError {
    /// Invalid caller input or malformed primitive value.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Hex text could not be decoded.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    /// Decoded value has the wrong byte length.
    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },
}
