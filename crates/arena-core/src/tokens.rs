use serde::{Deserialize, Serialize};

use crate::error::ArenaError;
use crate::types::{LocationId, Selector, Topic};

fn blake3_32(input: &[u8]) -> [u8; 32] {
    *blake3::hash(input).as_bytes()
}

/// Builds the canonical `name(t1,t2,...)` signature used for derivations.
///
/// Whitespace around the name and each parameter type is dropped.
pub fn canonical_signature<S: AsRef<str>>(name: &str, param_types: &[S]) -> String {
    let params: Vec<&str> = param_types.iter().map(|t| t.as_ref().trim()).collect();
    format!("{}({})", name.trim(), params.join(","))
}

/// Normalizes a textual signature into canonical form.
///
/// Fails when the text is not of the form `name(types...)`.
pub fn normalize_signature(signature: &str) -> Result<String, ArenaError> {
    let trimmed = signature.trim();
    let open = trimmed
        .find('(')
        .ok_or(ArenaError::InvalidInput("signature is missing '('"))?;
    if !trimmed.ends_with(')') {
        return Err(ArenaError::InvalidInput("signature is missing ')'"));
    }
    let name = &trimmed[..open];
    if name.trim().is_empty() {
        return Err(ArenaError::InvalidInput("signature has an empty name"));
    }
    let inner = &trimmed[open + 1..trimmed.len() - 1];
    let params: Vec<&str> = if inner.trim().is_empty() {
        Vec::new()
    } else {
        inner.split(',').collect()
    };
    Ok(canonical_signature(name, &params))
}

/// Derives an event topic: `H("topic" || canonical_signature)`.
pub fn derive_event_topic(signature: &str) -> Topic {
    let mut buf = Vec::with_capacity(5 + signature.len());
    buf.extend_from_slice(b"topic");
    buf.extend_from_slice(signature.as_bytes());
    Topic(blake3_32(&buf))
}

/// Derives a function selector: first 4 bytes of `H("fn" || canonical_signature)`.
pub fn derive_selector(signature: &str) -> Selector {
    let mut buf = Vec::with_capacity(2 + signature.len());
    buf.extend_from_slice(b"fn");
    buf.extend_from_slice(signature.as_bytes());
    let digest = blake3_32(&buf);
    Selector([digest[0], digest[1], digest[2], digest[3]])
}

/// Derives a transcript location token:
/// `H("loc" || block_number_be || location_id_be)`.
pub fn derive_location_token(block_number: u64, location: LocationId) -> [u8; 32] {
    let mut buf = Vec::with_capacity(3 + 8 + 2);
    buf.extend_from_slice(b"loc");
    buf.extend_from_slice(&block_number.to_be_bytes());
    buf.extend_from_slice(&location.to_be_bytes());
    blake3_32(&buf)
}

/// A location paired with the token committing it to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLocation {
    pub token: [u8; 32],
    pub block_number: u64,
    pub id: LocationId,
}

impl TranscriptLocation {
    pub fn new(block_number: u64, id: LocationId) -> Self {
        Self {
            token: derive_location_token(block_number, id),
            block_number,
            id,
        }
    }
}
