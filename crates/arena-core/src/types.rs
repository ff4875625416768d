use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ArenaError;

/// 16-bit identifier of an exit within a topology.
pub type ExitId = u16;
/// 16-bit identifier of a link within a topology.
pub type LinkId = u16;
/// 16-bit identifier of a location within a topology.
pub type LocationId = u16;

fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], ArenaError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let raw = hex::decode(digits)?;
    if raw.len() != N {
        return Err(ArenaError::Length {
            expected: N,
            actual: raw.len(),
        });
    }
    let mut out = [0_u8; N];
    out.copy_from_slice(&raw);
    Ok(out)
}

macro_rules! hex_newtype {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Byte length of the value.
            pub const LEN: usize = $len;

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = ArenaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_fixed::<$len>(s).map(Self)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }
    };
}

hex_newtype!(
    /// 20-byte address of the logical endpoint shared by all of its facets.
    Address,
    20
);
hex_newtype!(
    /// 32-byte event topic identifier.
    Topic,
    32
);
hex_newtype!(
    /// 4-byte function selector.
    Selector,
    4
);
hex_newtype!(
    /// Identifier the remote service assigns to a request once acknowledged.
    CorrelationId,
    32
);

#[cfg(test)]
mod tests {
    use super::{Address, ArenaError, Selector, Topic};

    #[test]
    fn address_parses_with_and_without_prefix() {
        let a: Address = "0x1111111111111111111111111111111111111111"
            .parse()
            .expect("address should parse");
        let b: Address = "1111111111111111111111111111111111111111"
            .parse()
            .expect("address should parse");
        assert_eq!(a, b);
        assert_eq!(a, Address([0x11; 20]));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        let topic = Topic([0xAB; 32]);
        let parsed: Topic = topic.to_string().parse().expect("topic should parse");
        assert_eq!(parsed, topic);
        assert_eq!(Selector([0xde, 0xad, 0xbe, 0xef]).to_string(), "0xdeadbeef");
    }

    #[test]
    fn wrong_length_is_rejected() {
        let err = "0x0102".parse::<Selector>().expect_err("2 bytes is too short");
        assert_eq!(
            err,
            ArenaError::Length {
                expected: 4,
                actual: 2
            }
        );
    }
}
