//! Near-duplicate matching over 64-bit simhash fingerprints.
//!
//! Given a corpus of fingerprints, this crate finds every pair within a
//! configured Hamming distance and groups the matches into clusters. The
//! search is the classic blocked-permutation scheme: partition the 64 bits
//! into `blocks` contiguous blocks, and for every choice of `blocks -
//! distance` blocks build a permutation that moves that choice to the top of
//! the word. Two fingerprints within `distance` bits must agree on one such
//! choice entirely, so sorting the permuted corpus co-locates every
//! candidate pair in a shared-prefix run.
//!
//! This trades an O(N²) all-pairs scan for `C(blocks, blocks - distance)`
//! sort-and-sweep passes, each O(N log N). Passes are independent and run in
//! parallel.
//!
//! ## Quick example
//!
//! ```
//! use fxhash::FxHashSet;
//! use matcher::{find_clusters, MatchConfig};
//!
//! let hashes: FxHashSet<u64> = [0x0, 0x1, 0xFF00].into_iter().collect();
//! let clusters = find_clusters(&hashes, &MatchConfig::new(4, 1)).unwrap();
//!
//! // 0x0 and 0x1 differ in one bit; 0xFF00 matches nothing.
//! assert_eq!(clusters.len(), 1);
//! assert_eq!(clusters[0].len(), 2);
//! ```

mod cluster;
mod engine;
pub mod permutation;
pub mod types;

pub use crate::cluster::find_clusters;
pub use crate::engine::find_all;
pub use crate::permutation::Permutation;
pub use crate::types::{
    Cluster, MatchConfig, MatchError, MatchPair, MatchSet, FINGERPRINT_BITS,
};
