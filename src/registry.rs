//! Package registry access
//!
//! The resolver only needs "fetch metadata for name@version"; this module
//! defines that seam and the metadata shape it returns.

mod npm;

pub use npm::{DEFAULT_REGISTRY, NpmRegistry};

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid registry URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    #[error("Package {name}@{version} not found")]
    NotFound { name: String, version: String },

    #[error("Failed to parse registry response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl RegistryError {
    /// Whether the registry reported the name/version as absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}

/// Metadata for one published version of a package.
///
/// Only the dependency maps are read; a missing map contributes no edges.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    pub dependencies: Option<BTreeMap<String, String>>,
    pub peer_dependencies: Option<BTreeMap<String, String>>,
    pub optional_dependencies: Option<BTreeMap<String, String>>,
}

/// Which dependency categories to follow
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeFilter {
    pub skip_peer: bool,
    pub skip_optional: bool,
}

impl PackageMetadata {
    /// Collapse the followed categories into one name -> specifier map.
    ///
    /// Categories are merged in the order dependencies, peer, optional; a
    /// name listed in several keeps the specifier of the last one.
    pub fn edges(&self, filter: EdgeFilter) -> BTreeMap<String, String> {
        let mut edges = BTreeMap::new();

        if let Some(deps) = &self.dependencies {
            edges.extend(deps.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if !filter.skip_peer
            && let Some(deps) = &self.peer_dependencies
        {
            edges.extend(deps.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if !filter.skip_optional
            && let Some(deps) = &self.optional_dependencies
        {
            edges.extend(deps.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        edges
    }
}

/// Source of package metadata.
///
/// Implementations own transport concerns (timeouts, retries). `version` is
/// already normalized: a concrete version or a dist-tag.
pub trait Registry: Sync {
    fn fetch_metadata(&self, name: &str, version: &str) -> Result<PackageMetadata, RegistryError>;
}

impl<R: Registry + ?Sized> Registry for &R {
    fn fetch_metadata(&self, name: &str, version: &str) -> Result<PackageMetadata, RegistryError> {
        (**self).fetch_metadata(name, version)
    }
}
