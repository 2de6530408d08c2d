//! Configuration and error types for simhash fingerprinting.
//!
//! The fingerprinting layer is a pure function of `(text, config)`: no I/O,
//! no environment lookups, no randomness beyond the configured seed. Two
//! configs with equal fields produce bit-identical fingerprints for equal
//! inputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for turning raw text into a 64-bit simhash fingerprint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// Shingle window width in bytes.
    ///
    /// Each overlapping window of this many bytes becomes one feature hash.
    /// Texts shorter than one window cannot be fingerprinted and are
    /// rejected up front.
    pub window: usize,
    /// Seed for the feature hash function.
    ///
    /// Fingerprints computed under different seeds are not comparable.
    pub seed: u64,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            window: 5,
            seed: 0x5EED_BA5E_5EED_BA5E,
        }
    }
}

/// Errors returned by the fingerprinting layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("cannot summarize an empty feature sequence")]
    EmptyFeatures,

    #[error("text of {len} bytes is shorter than one shingle window of {window}")]
    NotEnoughText { len: usize, window: usize },

    #[error("invalid config: window must be >= 1 (got {window})")]
    InvalidConfigWindow { window: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FingerprintConfig::default();
        assert_eq!(cfg.window, 5);
        assert_eq!(cfg.seed, 0x5EED_BA5E_5EED_BA5E);
    }

    #[test]
    fn equal_configs_compare_equal() {
        assert_eq!(FingerprintConfig::default(), FingerprintConfig::default());
        let reseeded = FingerprintConfig {
            seed: 1,
            ..Default::default()
        };
        assert_ne!(reseeded, FingerprintConfig::default());
    }

    #[test]
    fn empty_features_display() {
        assert_eq!(
            FingerprintError::EmptyFeatures.to_string(),
            "cannot summarize an empty feature sequence"
        );
    }

    #[test]
    fn not_enough_text_display_names_both_lengths() {
        let err = FingerprintError::NotEnoughText { len: 3, window: 5 };
        assert_eq!(
            err.to_string(),
            "text of 3 bytes is shorter than one shingle window of 5"
        );
    }

    #[test]
    fn invalid_window_display_names_the_value() {
        let err = FingerprintError::InvalidConfigWindow { window: 0 };
        assert_eq!(err.to_string(), "invalid config: window must be >= 1 (got 0)");
    }

    #[test]
    fn errors_are_cloneable_and_comparable() {
        let err = FingerprintError::NotEnoughText { len: 2, window: 7 };
        assert_eq!(err.clone(), err);
        assert_ne!(err, FingerprintError::EmptyFeatures);
    }
}
