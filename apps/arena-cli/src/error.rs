use arena_codec::CodecError;
use arena_core::error::ArenaError;
use arena_router::{InterfaceError, ManifestError, RouterError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("config: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid hex argument: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error(transparent)]
    Arena(#[from] ArenaError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Interface(#[from] InterfaceError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Router(#[from] RouterError),
    #[error("output encoding failed: {0}")]
    Output(#[from] serde_json::Error),
    #[error("no interface defines member {0}")]
    UnknownMember(String),
}
