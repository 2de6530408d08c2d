//! Byte-window shingling over raw text.
//!
//! Each overlapping window of `window` bytes becomes one 64-bit feature
//! hash. Shingling is deterministic for a given `(text, window, seed)` and
//! operates on raw bytes, so multi-byte characters may straddle windows;
//! that is intentional and keeps the feature stream cheap to compute.

use xxhash_rust::xxh3::xxh3_64_with_seed;

use crate::config::FingerprintError;

/// Hash every overlapping `window`-byte slice of `text`.
///
/// Returns `len - window + 1` feature hashes. Texts shorter than one window
/// are rejected rather than silently producing an empty feature stream.
pub fn shingle_bytes(text: &str, window: usize, seed: u64) -> Result<Vec<u64>, FingerprintError> {
    if window == 0 {
        return Err(FingerprintError::InvalidConfigWindow { window });
    }
    let bytes = text.as_bytes();
    if bytes.len() < window {
        return Err(FingerprintError::NotEnoughText {
            len: bytes.len(),
            window,
        });
    }

    Ok(bytes
        .windows(window)
        .map(|shingle| xxh3_64_with_seed(shingle, seed))
        .collect())
}
