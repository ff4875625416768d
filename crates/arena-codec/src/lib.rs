//! Arena topology wire codec.
//!
//! Converts between the compact byte forms the remote service exchanges for
//! locations, exits and links and their structured representations, plus
//! CBOR bundles of whole topologies.

pub mod error;
pub mod exit;
pub mod link;
pub mod location;
pub mod topology;

pub use error::CodecError;
pub use exit::{decode_exit, encode_exit, Exit, EXIT_WIRE_LEN};
pub use link::{decode_link, encode_link, DoorState, Link, LinkKind, LINK_WIRE_LEN};
pub use location::{
    decode_location, encode_location, Location, LocationKind, RawLocation, SideKind,
};
pub use topology::{decode_topology_cbor, encode_topology_cbor, Topology};
