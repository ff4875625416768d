use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::exit::{decode_exit, encode_exit, Exit, EXIT_WIRE_LEN};
use crate::link::{decode_link, encode_link, Link, LinkKind, LINK_WIRE_LEN};
use crate::location::{encode_location, Location, RawLocation};

/// A whole map: locations, exits and links, each addressed by its index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    pub locations: Vec<Location>,
    pub exits: Vec<Exit>,
    pub links: Vec<Link>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TopologyBytes {
    locations: Vec<RawLocation>,
    exits: Vec<[u8; EXIT_WIRE_LEN]>,
    links: Vec<[u8; LINK_WIRE_LEN]>,
}

impl Topology {
    /// Checks that every id reference resolves to an entry of the bundle.
    pub fn validate(&self) -> Result<(), CodecError> {
        let exit_ok = |id: u16| usize::from(id) < self.exits.len();

        for location in &self.locations {
            if !location.sides.iter().flatten().all(|id| exit_ok(*id)) {
                return Err(CodecError::InvalidTopology(
                    "location side references unknown exit",
                ));
            }
        }
        for exit in &self.exits {
            if usize::from(exit.link) >= self.links.len() {
                return Err(CodecError::InvalidTopology("exit references unknown link"));
            }
            if usize::from(exit.location) >= self.locations.len() {
                return Err(CodecError::InvalidTopology(
                    "exit references unknown location",
                ));
            }
        }
        for link in &self.links {
            if link.kind == LinkKind::Invalid {
                return Err(CodecError::InvalidTopology("link kind is invalid"));
            }
            if !link.exits.iter().all(|id| exit_ok(*id)) {
                return Err(CodecError::InvalidTopology("link references unknown exit"));
            }
        }
        Ok(())
    }
}

/// Encodes a topology as CBOR over the byte forms after validation.
pub fn encode_topology_cbor(topology: &Topology) -> Result<Vec<u8>, CodecError> {
    topology.validate()?;
    let wire = TopologyBytes {
        locations: topology.locations.iter().map(encode_location).collect(),
        exits: topology.exits.iter().map(encode_exit).collect(),
        links: topology.links.iter().map(encode_link).collect(),
    };
    let mut bytes = Vec::new();
    ciborium::ser::into_writer(&wire, &mut bytes)
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Decodes and validates a CBOR topology bundle.
pub fn decode_topology_cbor(bytes: &[u8]) -> Result<Topology, CodecError> {
    let wire: TopologyBytes =
        ciborium::de::from_reader(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
    let topology = Topology {
        locations: wire
            .locations
            .iter()
            .map(RawLocation::decode)
            .collect::<Result<_, _>>()?,
        exits: wire
            .exits
            .iter()
            .map(|b| decode_exit(b))
            .collect::<Result<_, _>>()?,
        links: wire
            .links
            .iter()
            .map(|b| decode_link(b))
            .collect::<Result<_, _>>()?,
    };
    topology.validate()?;
    Ok(topology)
}
