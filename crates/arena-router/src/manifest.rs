use std::fs;
use std::path::{Path, PathBuf};

use arena_core::Address;
use serde::{Deserialize, Serialize};

use crate::error::ManifestError;

/// One facet of the endpoint, in router construction order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetEntry {
    pub name: String,
    /// JSON descriptor path, relative to the manifest directory.
    pub descriptor: PathBuf,
}

/// Deployment description of one logical endpoint.
///
/// ```toml
/// address = "0x5fbdb2315678afecb367f032d93f642f64180aa3"
/// primary = "abi/Diamond.json"
///
/// [[facets]]
/// name = "ArenaFacet"
/// descriptor = "abi/ArenaFacet.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointManifest {
    pub address: String,
    pub primary: PathBuf,
    #[serde(default)]
    pub facets: Vec<FacetEntry>,
}

impl EndpointManifest {
    pub fn from_toml_str(text: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let text = read_text(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn endpoint_address(&self) -> Result<Address, ManifestError> {
        self.address.parse().map_err(ManifestError::Address)
    }
}

pub(crate) fn read_text(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.display().to_string(),
        source,
    })
}
