use thiserror::Error;

use crate::location::SideKind;

/// Errors returned by topology codec operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Fixed-size payload had the wrong length.
    #[error("invalid {what} length: expected {expected} bytes, got {actual}")]
    Length {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Side byte string cannot be split into 16-bit exit ids.
    #[error("odd-length {side:?} side: {len} bytes")]
    OddSide { side: SideKind, len: usize },
    /// Kind byte outside the known enumeration.
    #[error("unknown {what} kind: {value}")]
    UnknownKind { what: &'static str, value: u8 },
    /// Topology bundle references that do not resolve.
    #[error("invalid topology: {0}")]
    InvalidTopology(&'static str),
    /// CBOR serialization failure.
    #[error("encode error: {0}")]
    Encode(String),
    /// CBOR deserialization failure.
    #[error("decode error: {0}")]
    Decode(String),
}
