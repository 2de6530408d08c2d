//! Simhash fingerprinting for near-duplicate detection.
//!
//! This crate turns documents into 64-bit fingerprints whose Hamming
//! distance tracks document dissimilarity: near-duplicate texts land on
//! fingerprints that differ in only a few bits.
//!
//! ## What you need to know
//!
//! - Pure functions: same input = same output. No I/O, no randomness beyond
//!   the configured seed.
//! - The fingerprint is a per-bit majority vote over feature hashes, so it
//!   depends only on the multiset of features, not their order.
//!
//! ## The pipeline (two stages)
//!
//! 1. **Shingling** - hash every overlapping window of `window` bytes into a
//!    64-bit feature.
//! 2. **Summarization** - vote each bit position across all features;
//!    majority `1` sets the bit, ties clear it.
//!
//! ## Quick example
//!
//! ```
//! use fingerprint::{fingerprint_text, hamming, FingerprintConfig};
//!
//! let cfg = FingerprintConfig::default();
//! let a = fingerprint_text("the quick brown fox jumps over the lazy dog", &cfg).unwrap();
//! let b = fingerprint_text("the quick brown fox jumps over the lazy cog", &cfg).unwrap();
//!
//! // Near-duplicate texts stay well below the ~32 bits unrelated texts land at.
//! assert!(hamming(a, b) < 32);
//! ```

mod bits;
pub mod config;
mod shingle;
mod summarize;

pub use crate::bits::hamming;
pub use crate::config::{FingerprintConfig, FingerprintError};
pub use crate::shingle::shingle_bytes;
pub use crate::summarize::summarize;

/// Compute the simhash fingerprint of a text (shingle → summarize).
pub fn fingerprint_text(text: &str, cfg: &FingerprintConfig) -> Result<u64, FingerprintError> {
    if cfg.window == 0 {
        return Err(FingerprintError::InvalidConfigWindow { window: cfg.window });
    }
    let features = shingle_bytes(text, cfg.window, cfg.seed)?;
    summarize(&features)
}
