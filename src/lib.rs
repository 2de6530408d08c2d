//! Workspace umbrella crate for simhash near-duplicate detection.
//!
//! The `simdedup` crate re-exports the fingerprinting and matching layers so
//! applications can drive the full pipeline through a single dependency:
//! summarize documents into 64-bit simhash fingerprints, find every pair
//! within a Hamming-distance threshold with blocked-permutation search, and
//! group the matches into clusters.
//!
//! ## Quick start
//!
//! ```
//! use fxhash::FxHashSet;
//! use simdedup::{process_corpus, process_document, DedupConfig};
//!
//! # fn demo() -> Result<(), simdedup::PipelineError> {
//! let config = DedupConfig::default();
//!
//! let corpus: FxHashSet<u64> = [
//!     "the quick brown fox jumps over the lazy dog",
//!     "the quick brown fox jumps over the lazy cog",
//!     "an entirely different piece of writing altogether",
//! ]
//! .iter()
//! .map(|text| process_document(text, &config))
//! .collect::<Result<_, _>>()?;
//!
//! let clusters = process_corpus(&corpus, &config)?;
//! # let _ = clusters;
//! # Ok(())
//! # }
//! ```
//!
//! The CLI driver in `src/main.rs` layers TSV/JSON ingestion from
//! [`dataset`] and YAML configuration from [`config`] on top of these same
//! entry points.
//!
//! ## Errors
//!
//! Failures from either layer converge on [`PipelineError`], so callers can
//! handle the pipeline uniformly without depending on the individual
//! workspace crates.

pub use fingerprint::{
    fingerprint_text, hamming, shingle_bytes, summarize, FingerprintConfig, FingerprintError,
};
pub use matcher::{
    find_all, find_clusters, Cluster, MatchConfig, MatchError, MatchPair, MatchSet, Permutation,
    FINGERPRINT_BITS,
};

pub mod config;
pub mod dataset;

pub use crate::config::{ConfigLoadError, DedupConfig};

use std::error::Error;
use std::fmt;

use fxhash::FxHashSet;

/// Errors that can occur while processing documents through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Fingerprint(FingerprintError),
    Match(MatchError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Fingerprint(err) => write!(f, "fingerprinting failure: {err}"),
            PipelineError::Match(err) => write!(f, "matching failure: {err}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Fingerprint(err) => Some(err),
            PipelineError::Match(err) => Some(err),
        }
    }
}

impl From<FingerprintError> for PipelineError {
    fn from(value: FingerprintError) -> Self {
        PipelineError::Fingerprint(value)
    }
}

impl From<MatchError> for PipelineError {
    fn from(value: MatchError) -> Self {
        PipelineError::Match(value)
    }
}

/// Fingerprint one document with the pipeline's fingerprint settings.
pub fn process_document(text: &str, config: &DedupConfig) -> Result<u64, PipelineError> {
    Ok(fingerprint_text(text, &config.fingerprint)?)
}

/// Find every near-duplicate pair in a fingerprint corpus.
pub fn process_matches(
    hashes: &FxHashSet<u64>,
    config: &DedupConfig,
) -> Result<MatchSet, PipelineError> {
    Ok(find_all(hashes, &config.matcher)?)
}

/// Cluster a fingerprint corpus into groups of near-duplicates.
pub fn process_corpus(
    hashes: &FxHashSet<u64>,
    config: &DedupConfig,
) -> Result<Vec<Cluster>, PipelineError> {
    Ok(find_clusters(hashes, &config.matcher)?)
}
