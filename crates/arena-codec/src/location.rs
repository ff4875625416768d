use arena_core::ExitId;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

/// Location kind carried in the first wire byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum LocationKind {
    Undefined = 0,
    Room = 1,
    Intersection = 2,
    Corridor = 3,
}

impl TryFrom<u8> for LocationKind {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Undefined),
            1 => Ok(Self::Room),
            2 => Ok(Self::Intersection),
            3 => Ok(Self::Corridor),
            _ => Err(CodecError::UnknownKind {
                what: "location",
                value,
            }),
        }
    }
}

/// Compass side of a location.
///
/// `Undefined` (0) is reserved, so the populated sides start at `North` (1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SideKind {
    Undefined = 0,
    North = 1,
    West = 2,
    South = 3,
    East = 4,
    Invalid = 5,
}

impl SideKind {
    /// Populated sides in wire order.
    pub const ALL: [SideKind; 4] = [
        SideKind::North,
        SideKind::West,
        SideKind::South,
        SideKind::East,
    ];

    /// Slot in [`Location::sides`], `None` for the reserved sides.
    pub fn slot(self) -> Option<usize> {
        match self {
            SideKind::North | SideKind::West | SideKind::South | SideKind::East => {
                Some(self as usize - 1)
            }
            SideKind::Undefined | SideKind::Invalid => None,
        }
    }
}

impl TryFrom<u8> for SideKind {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Undefined),
            1 => Ok(Self::North),
            2 => Ok(Self::West),
            3 => Ok(Self::South),
            4 => Ok(Self::East),
            5 => Ok(Self::Invalid),
            _ => Err(CodecError::UnknownKind {
                what: "side",
                value,
            }),
        }
    }
}

/// Ordered wire tuple `(kind, [north, west, south, east])`.
pub type LocationTuple = (u8, [Vec<ExitId>; 4]);

/// Decoded location: kind plus the exit ids reachable from each side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub kind: LocationKind,
    /// Exit ids per side, indexed by [`SideKind::slot`].
    pub sides: [Vec<ExitId>; 4],
}

impl Location {
    pub fn new(kind: LocationKind) -> Self {
        Self {
            kind,
            sides: Default::default(),
        }
    }

    /// Exits on `side`; always empty for the reserved sides.
    pub fn exits(&self, side: SideKind) -> &[ExitId] {
        match side.slot() {
            Some(slot) => &self.sides[slot],
            None => &[],
        }
    }

    /// Appends an exit to `side`. Returns false for the reserved sides.
    pub fn add_exit(&mut self, side: SideKind, exit: ExitId) -> bool {
        match side.slot() {
            Some(slot) => {
                self.sides[slot].push(exit);
                true
            }
            None => false,
        }
    }

    pub fn to_wire(&self) -> LocationTuple {
        (self.kind as u8, self.sides.clone())
    }

    pub fn from_wire(wire: LocationTuple) -> Result<Self, CodecError> {
        let (kind, sides) = wire;
        Ok(Self {
            kind: LocationKind::try_from(kind)?,
            sides,
        })
    }
}

/// Byte form of a location: kind byte and one byte string per side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLocation {
    pub kind: u8,
    pub sides: [Vec<u8>; 4],
}

impl RawLocation {
    pub fn decode(&self) -> Result<Location, CodecError> {
        let [north, west, south, east] = &self.sides;
        decode_location(self.kind, north, west, south, east)
    }
}

fn decode_side(side: SideKind, bytes: &[u8]) -> Result<Vec<ExitId>, CodecError> {
    if bytes.len() % 2 != 0 {
        return Err(CodecError::OddSide {
            side,
            len: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

/// Decodes a location from its kind byte and four side byte strings.
///
/// Each non-empty side must have even length and is read as consecutive
/// big-endian 16-bit exit ids. A kind byte outside [`LocationKind`] is
/// rejected with [`CodecError::UnknownKind`] rather than decoded as undefined.
pub fn decode_location(
    kind: u8,
    north: &[u8],
    west: &[u8],
    south: &[u8],
    east: &[u8],
) -> Result<Location, CodecError> {
    let kind = LocationKind::try_from(kind)?;
    let mut location = Location::new(kind);
    for (side, bytes) in SideKind::ALL.into_iter().zip([north, west, south, east]) {
        if let Some(slot) = side.slot() {
            location.sides[slot] = decode_side(side, bytes)?;
        }
    }
    Ok(location)
}

/// Encodes a location into its byte form.
pub fn encode_location(location: &Location) -> RawLocation {
    let sides = location.sides.clone().map(|exits| {
        let mut bytes = Vec::with_capacity(exits.len() * 2);
        for exit in exits {
            bytes.extend_from_slice(&exit.to_be_bytes());
        }
        bytes
    });
    RawLocation {
        kind: location.kind as u8,
        sides,
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_location, encode_location, Location, LocationKind, SideKind};
    use crate::error::CodecError;

    #[test]
    fn decodes_sides_in_compass_order() {
        let loc = decode_location(0x01, &[], &[0x00, 0x02], &[0x00, 0x03], &[0x00, 0x06])
            .expect("location should decode");
        assert_eq!(loc.kind, LocationKind::Room);
        assert!(loc.exits(SideKind::North).is_empty());
        assert_eq!(loc.exits(SideKind::West), &[2]);
        assert_eq!(loc.exits(SideKind::South), &[3]);
        assert_eq!(loc.exits(SideKind::East), &[6]);
    }

    #[test]
    fn multi_exit_side_is_big_endian() {
        let loc = decode_location(0x03, &[0x01, 0x02, 0x00, 0xFF], &[], &[], &[])
            .expect("location should decode");
        assert_eq!(loc.exits(SideKind::North), &[0x0102, 0x00FF]);
    }

    #[test]
    fn odd_side_length_fails_with_side_name() {
        let err = decode_location(0x01, &[], &[], &[0x00, 0x01, 0x02], &[])
            .expect_err("odd side should fail");
        assert!(matches!(
            err,
            CodecError::OddSide {
                side: SideKind::South,
                len: 3
            }
        ));
    }

    #[test]
    fn unknown_kind_fails() {
        let err = decode_location(0x07, &[], &[], &[], &[]).expect_err("kind 7 is unknown");
        assert!(matches!(
            err,
            CodecError::UnknownKind {
                what: "location",
                value: 7
            }
        ));
    }

    #[test]
    fn reserved_sides_are_never_populated() {
        let mut loc = Location::new(LocationKind::Corridor);
        assert!(!loc.add_exit(SideKind::Undefined, 1));
        assert!(!loc.add_exit(SideKind::Invalid, 1));
        assert!(loc.add_exit(SideKind::East, 1));
        assert!(loc.exits(SideKind::Undefined).is_empty());
        assert_eq!(loc.exits(SideKind::East), &[1]);
    }

    #[test]
    fn byte_form_round_trips() {
        let mut loc = Location::new(LocationKind::Intersection);
        loc.add_exit(SideKind::North, 1);
        loc.add_exit(SideKind::North, 513);
        loc.add_exit(SideKind::East, 9);
        let raw = encode_location(&loc);
        assert_eq!(raw.sides[0], vec![0x00, 0x01, 0x02, 0x01]);
        assert!(raw.sides[1].is_empty());
        assert_eq!(raw.decode().expect("should decode"), loc);
    }

    #[test]
    fn wire_tuple_round_trips() {
        let mut loc = Location::new(LocationKind::Room);
        loc.add_exit(SideKind::West, 4);
        let wire = loc.to_wire();
        assert_eq!(wire.0, 1);
        assert_eq!(wire.1[1], vec![4]);
        assert_eq!(Location::from_wire(wire).expect("should convert"), loc);
    }
}
