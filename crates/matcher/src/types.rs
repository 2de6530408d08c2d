use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of bits in a fingerprint. The block partition and every
/// permutation are defined over words of this width.
pub const FINGERPRINT_BITS: u32 = 64;

/// An unordered near-duplicate pair, stored as `(min, max)`.
pub type MatchPair = (u64, u64);

/// The deduplicated set of near-duplicate pairs found in a corpus.
pub type MatchSet = FxHashSet<MatchPair>;

/// One connected component of the match graph.
pub type Cluster = FxHashSet<u64>;

/// Configuration for a near-neighbor scan.
///
/// `MatchConfig` is cheap to clone and serde-friendly so it can be embedded
/// in higher-level configs or passed across process boundaries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchConfig {
    /// Number of contiguous bit blocks the 64-bit word is partitioned into.
    /// Must satisfy `distance < blocks <= 64`.
    pub blocks: u32,
    /// Maximum Hamming distance for two fingerprints to match. Must be >= 1.
    pub distance: u32,
    /// Run the permutation passes on a rayon thread pool.
    ///
    /// The sequential and parallel paths produce equal results; this is a
    /// performance switch only.
    #[serde(default = "MatchConfig::default_use_parallel")]
    pub use_parallel: bool,
}

impl MatchConfig {
    /// Construct a config with parallelism enabled.
    pub fn new(blocks: u32, distance: u32) -> Self {
        Self {
            blocks,
            distance,
            use_parallel: Self::default_use_parallel(),
        }
    }

    pub(crate) fn default_use_parallel() -> bool {
        true
    }

    /// Validate the block/distance combination.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.distance == 0 {
            return Err(MatchError::InvalidConfig(
                "distance must be at least 1".into(),
            ));
        }
        if self.blocks > FINGERPRINT_BITS {
            return Err(MatchError::InvalidConfig(format!(
                "blocks ({}) must not exceed {FINGERPRINT_BITS}",
                self.blocks
            )));
        }
        if self.blocks <= self.distance {
            return Err(MatchError::InvalidConfig(format!(
                "blocks ({}) must be greater than distance ({})",
                self.blocks, self.distance
            )));
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::new(6, 3)
    }
}

/// Errors produced by the matching layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Invalid block/distance combination or malformed block-mask list.
    #[error("invalid match config: {0}")]
    InvalidConfig(String),
}
