//! npm registry integration
//!
//! Fetches per-version package documents from `<registry>/<name>/<version>`.

use super::{PackageMetadata, Registry, RegistryError};
use std::time::Duration;
use tracing::debug;

/// Public npm registry
pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.com";

/// Body the registry sends for unknown packages
const NOT_FOUND_BODY: &str = "\"Not Found\"";

/// Blocking npm registry client
pub struct NpmRegistry {
    agent: ureq::Agent,
    base_url: String,
}

impl NpmRegistry {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Registry for NpmRegistry {
    fn fetch_metadata(&self, name: &str, version: &str) -> Result<PackageMetadata, RegistryError> {
        let url = build_url(&self.base_url, name, version)?;
        debug!(%url, "requesting package metadata");

        let response = self
            .agent
            .get(&url)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| match e {
                ureq::Error::BadUri(msg) => RegistryError::InvalidUrl(format!("{}: {}", url, msg)),
                other => RegistryError::Network {
                    url: url.clone(),
                    message: other.to_string(),
                },
            })?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| RegistryError::Network {
                url: url.clone(),
                message: e.to_string(),
            })?;

        parse_response(status, &body, &url, name, version)
    }
}

/// Build the version document URL, rejecting names that cannot form a path
fn build_url(base_url: &str, name: &str, version: &str) -> Result<String, RegistryError> {
    if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
        return Err(RegistryError::InvalidUrl(format!(
            "registry '{}' must start with http:// or https://",
            base_url
        )));
    }

    for (what, value) in [("package name", name), ("version", version)] {
        if !is_path_safe(value) {
            return Err(RegistryError::InvalidUrl(format!(
                "{} '{}' cannot be used in a registry URL",
                what, value
            )));
        }
    }

    Ok(format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        name,
        version
    ))
}

fn is_path_safe(segment: &str) -> bool {
    !segment.is_empty()
        && !segment
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '?' | '#' | '%'))
}

/// Map a registry response to metadata or the matching error
fn parse_response(
    status: u16,
    body: &str,
    url: &str,
    name: &str,
    version: &str,
) -> Result<PackageMetadata, RegistryError> {
    if status == 404 || body.trim() == NOT_FOUND_BODY {
        return Err(RegistryError::NotFound {
            name: name.to_string(),
            version: version.to_string(),
        });
    }

    if !(200..300).contains(&status) {
        return Err(RegistryError::Network {
            url: url.to_string(),
            message: format!("HTTP {}", status),
        });
    }

    serde_json::from_str(body).map_err(|e| RegistryError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}
