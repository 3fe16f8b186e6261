//! Configuration file support for lsdeps
//!
//! Reads configuration from `~/.config/lsdeps/config.json`:
//!
//! ```json
//! {
//!   "registry": "https://registry.npmjs.com",
//!   "jobs": 8,
//!   "timeout_secs": 10,
//!   "fallback_to_latest": false,
//!   "skip_peer": false,
//!   "skip_optional": false
//! }
//! ```
//!
//! Every key is optional. Command-line flags take precedence.

use crate::registry::DEFAULT_REGISTRY;
use crate::resolver::ResolveOptions;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_JOBS: usize = 8;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine config directory. HOME environment variable not set.")]
    NoConfigDir,

    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Registry base URL
    pub registry: String,

    /// Maximum concurrent registry requests
    pub jobs: usize,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Retry a missing dependency version with `latest`
    pub fallback_to_latest: bool,

    pub skip_peer: bool,
    pub skip_optional: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY.to_string(),
            jobs: DEFAULT_JOBS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            fallback_to_latest: false,
            skip_peer: false,
            skip_optional: false,
        }
    }
}

impl Config {
    /// Load configuration from the default path or return defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(config_path())
    }

    /// Load from a resolved config path; no config directory means defaults
    fn load_from(path: Result<PathBuf, ConfigError>) -> Result<Self, ConfigError> {
        let path = match path {
            Ok(path) => path,
            Err(ConfigError::NoConfigDir) => return Ok(Config::default()),
            Err(e) => return Err(e),
        };

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::ParseError { path, source })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            skip_peer: self.skip_peer,
            skip_optional: self.skip_optional,
            jobs: self.jobs.max(1),
            fallback_to_latest: self.fallback_to_latest,
        }
    }
}

/// Returns the config file path: `~/.config/lsdeps/config.json`
pub fn config_path() -> Result<PathBuf, ConfigError> {
    // Use XDG_CONFIG_HOME if set, otherwise fall back to ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".config"))
                .unwrap_or_default()
        });

    if config_base.as_os_str().is_empty() {
        return Err(ConfigError::NoConfigDir);
    }

    Ok(config_base.join("lsdeps").join("config.json"))
}
