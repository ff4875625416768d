//! Core arena client primitives shared across crates.
//!
//! Includes fixed-size identifiers, blake3 derivations for topics, selectors
//! and location tokens, the bounded FIFO window, and base errors.

pub mod error;
pub mod fifo;
pub mod tokens;
pub mod types;

pub use fifo::{push_fifo, BoundedWindow};
pub use types::{Address, CorrelationId, ExitId, LinkId, LocationId, Selector, Topic};
