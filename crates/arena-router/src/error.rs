use arena_core::error::ArenaError;
use arena_core::Topic;
use thiserror::Error;

/// Errors building or querying a facet interface.
#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("invalid descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),
    #[error("invalid fragment: {0}")]
    Fragment(&'static str),
    #[error("duplicate fragment: {0}")]
    Duplicate(String),
    #[error("invalid signature: {0}")]
    Signature(#[from] ArenaError),
    #[error("no event for topic {0}")]
    UnknownTopic(Topic),
}

/// Errors loading an endpoint manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid endpoint address: {0}")]
    Address(ArenaError),
}

/// Errors returned by router construction and router-native operations.
///
/// Member resolution never fails; an unknown member resolves to nothing.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("duplicate facet name: {0}")]
    DuplicateFacet(String),
    #[error("unknown facet: {0}")]
    UnknownFacet(String),
    #[error("no facet defines event filter {0}")]
    FilterNotFound(String),
    #[error("filter {signature} takes {indexed} indexed arguments, got {given}")]
    TooManyFilterArgs {
        signature: String,
        indexed: usize,
        given: usize,
    },
    #[error(
        "unrecognized event topic {}",
        .topic.map(|t| t.to_string()).unwrap_or_else(|| "<none>".to_string())
    )]
    UnrecognizedTopic {
        topic: Option<Topic>,
        #[source]
        source: Option<InterfaceError>,
    },
    #[error("facet {facet}: {source}")]
    Interface {
        facet: String,
        #[source]
        source: InterfaceError,
    },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Errors forwarding a member call to the remote endpoint.
#[derive(Debug, Error)]
pub enum CallError<E> {
    #[error("unknown member: {0}")]
    UnknownMember(String),
    #[error("transport error: {0}")]
    Transport(E),
}
