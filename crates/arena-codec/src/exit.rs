use arena_core::{LinkId, LocationId};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Exact byte length of an encoded exit.
pub const EXIT_WIRE_LEN: usize = 2 + 2;

/// Ordered wire tuple `(link_id, location_id)`.
pub type ExitTuple = (LinkId, LocationId);

/// One side of a link: the link it belongs to and the location it opens from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exit {
    pub link: LinkId,
    pub location: LocationId,
}

impl Exit {
    pub fn new(link: LinkId, location: LocationId) -> Self {
        Self { link, location }
    }

    pub fn to_wire(&self) -> ExitTuple {
        (self.link, self.location)
    }

    pub fn from_wire((link, location): ExitTuple) -> Self {
        Self { link, location }
    }
}

/// Decodes an exit from exactly four bytes: big-endian link id then location id.
pub fn decode_exit(bytes: &[u8]) -> Result<Exit, CodecError> {
    if bytes.len() != EXIT_WIRE_LEN {
        return Err(CodecError::Length {
            what: "exit",
            expected: EXIT_WIRE_LEN,
            actual: bytes.len(),
        });
    }
    Ok(Exit {
        link: u16::from_be_bytes([bytes[0], bytes[1]]),
        location: u16::from_be_bytes([bytes[2], bytes[3]]),
    })
}

pub fn encode_exit(exit: &Exit) -> [u8; EXIT_WIRE_LEN] {
    let mut out = [0_u8; EXIT_WIRE_LEN];
    out[..2].copy_from_slice(&exit.link.to_be_bytes());
    out[2..].copy_from_slice(&exit.location.to_be_bytes());
    out
}
