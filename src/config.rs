//! YAML configuration file support for the dedup pipeline.
//!
//! Lets deployments pin the fingerprinting and matching parameters in a
//! single YAML file instead of repeating command-line flags. Command-line
//! options override whatever the file provides.
//!
//! ## Example YAML configuration
//!
//! ```yaml
//! fingerprint:
//!   window: 5
//!   seed: 1732584193
//!
//! matcher:
//!   blocks: 6
//!   distance: 3
//!   use_parallel: true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fingerprint::FingerprintConfig;
use matcher::MatchConfig;

/// Errors that can occur when loading YAML configuration files.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level configuration for the whole dedup pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DedupConfig {
    /// Text-to-fingerprint settings (JSON input only).
    #[serde(default)]
    pub fingerprint: FingerprintConfig,
    /// Near-neighbor search settings.
    #[serde(default)]
    pub matcher: MatchConfig,
}

impl DedupConfig {
    /// Load and validate a configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    /// Parse and validate a configuration from a YAML string.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigLoadError> {
        let config: DedupConfig = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the cross-field invariants of both sections.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.fingerprint.window == 0 {
            return Err(ConfigLoadError::Validation(
                "fingerprint.window must be >= 1".into(),
            ));
        }
        self.matcher
            .validate()
            .map_err(|err| ConfigLoadError::Validation(err.to_string()))
    }
}
