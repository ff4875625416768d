use arena_core::ExitId;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Exact byte length of an encoded link: kind plus two exit ids.
pub const LINK_WIRE_LEN: usize = 1 + 2 + 2;

/// Link kind carried in the first wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LinkKind {
    Undefined = 0,
    Door = 1,
    Archway = 2,
    Invalid = 3,
}

impl TryFrom<u8> for LinkKind {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Undefined),
            1 => Ok(Self::Door),
            2 => Ok(Self::Archway),
            3 => Ok(Self::Invalid),
            _ => Err(CodecError::UnknownKind {
                what: "link",
                value,
            }),
        }
    }
}

/// Runtime door state. Never part of the byte form; decoded links start
/// closed, unlocked, without a key and without autoclose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorState {
    /// Access key, `0` when none is set.
    pub key: u64,
    pub autoclose: bool,
    pub locked: bool,
    pub open: bool,
}

impl DoorState {
    /// Opens the door unless it is locked.
    pub fn open(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.open = true;
        true
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Closes and locks the door with `key`.
    pub fn lock(&mut self, key: u64) {
        self.key = key;
        self.open = false;
        self.locked = true;
    }

    /// Unlocks when `key` matches the lock key.
    pub fn unlock(&mut self, key: u64) -> bool {
        if self.locked && self.key != key {
            return false;
        }
        self.locked = false;
        true
    }
}

/// Ordered wire tuple `(kind, exits, key, autoclose, locked, open)`.
pub type LinkTuple = (u8, [ExitId; 2], u64, bool, bool, bool);

/// Connection between two exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub kind: LinkKind,
    pub exits: [ExitId; 2],
    pub state: DoorState,
}

impl Link {
    pub fn new(kind: LinkKind, exits: [ExitId; 2]) -> Self {
        Self {
            kind,
            exits,
            state: DoorState::default(),
        }
    }

    pub fn to_wire(&self) -> LinkTuple {
        (
            self.kind as u8,
            self.exits,
            self.state.key,
            self.state.autoclose,
            self.state.locked,
            self.state.open,
        )
    }

    pub fn from_wire(wire: LinkTuple) -> Result<Self, CodecError> {
        let (kind, exits, key, autoclose, locked, open) = wire;
        Ok(Self {
            kind: LinkKind::try_from(kind)?,
            exits,
            state: DoorState {
                key,
                autoclose,
                locked,
                open,
            },
        })
    }
}

/// Decodes a link from exactly five bytes: kind, then two big-endian exit ids.
///
/// A kind byte outside [`LinkKind`] is rejected with [`CodecError::UnknownKind`].
pub fn decode_link(bytes: &[u8]) -> Result<Link, CodecError> {
    if bytes.len() != LINK_WIRE_LEN {
        return Err(CodecError::Length {
            what: "link",
            expected: LINK_WIRE_LEN,
            actual: bytes.len(),
        });
    }
    let kind = LinkKind::try_from(bytes[0])?;
    Ok(Link::new(
        kind,
        [
            u16::from_be_bytes([bytes[1], bytes[2]]),
            u16::from_be_bytes([bytes[3], bytes[4]]),
        ],
    ))
}

/// Encodes the byte form of a link. Door state is dropped.
pub fn encode_link(link: &Link) -> [u8; LINK_WIRE_LEN] {
    let mut out = [0_u8; LINK_WIRE_LEN];
    out[0] = link.kind as u8;
    out[1..3].copy_from_slice(&link.exits[0].to_be_bytes());
    out[3..].copy_from_slice(&link.exits[1].to_be_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::{decode_link, encode_link, DoorState, Link, LinkKind};

    #[test]
    fn decodes_kind_and_exits_with_fresh_state() {
        let link = decode_link(&[0x01, 0x00, 0x02, 0x01, 0x00]).expect("link should decode");
        assert_eq!(link.kind, LinkKind::Door);
        assert_eq!(link.exits, [2, 256]);
        assert_eq!(link.state, DoorState::default());
        assert!(!link.state.open && !link.state.locked && !link.state.autoclose);
        assert_eq!(link.state.key, 0);
    }

    #[test]
    fn rejects_wrong_length_and_unknown_kind() {
        assert!(decode_link(&[0x01, 0x00, 0x02, 0x00]).is_err());
        assert!(decode_link(&[0x01, 0x00, 0x02, 0x00, 0x03, 0x00]).is_err());
        let err = decode_link(&[0x04, 0, 0, 0, 0]).expect_err("kind 4 is unknown");
        assert!(err.to_string().contains("unknown link kind: 4"));
    }

    #[test]
    fn byte_form_excludes_door_state() {
        let mut link = Link::new(LinkKind::Archway, [7, 8]);
        link.state.lock(99);
        link.state.autoclose = true;
        let bytes = encode_link(&link);
        assert_eq!(bytes, [0x02, 0x00, 0x07, 0x00, 0x08]);
        let decoded = decode_link(&bytes).expect("should decode");
        assert_eq!(decoded.exits, link.exits);
        assert_eq!(decoded.state, DoorState::default());
    }

    #[test]
    fn wire_tuple_carries_door_state() {
        let mut link = Link::new(LinkKind::Door, [1, 2]);
        link.state.lock(5);
        let wire = link.to_wire();
        assert_eq!(wire, (1, [1, 2], 5, false, true, false));
        assert_eq!(Link::from_wire(wire).expect("should convert"), link);
    }

    #[test]
    fn door_lock_requires_matching_key() {
        let mut door = DoorState::default();
        assert!(door.open());
        door.lock(42);
        assert!(!door.open);
        assert!(!door.open());
        assert!(!door.unlock(41));
        assert!(door.unlock(42));
        assert!(door.open());
        door.close();
        assert!(!door.open);
    }
}
