//! Near-neighbor engine: sort-and-sweep over permuted fingerprints.
//!
//! For each permutation from the plan, the corpus is permuted, sorted, and
//! swept in runs that share the permuted prefix; only pairs inside a run can
//! be within `distance` bits, so the all-pairs check collapses to small
//! per-run checks. Passes are independent and run on the rayon pool when
//! `use_parallel` is set; each pass keeps a private scratch buffer and a
//! local pair bag, merged into the result set after all passes join.

use std::time::Instant;

use fingerprint::hamming;
use fxhash::FxHashSet;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::permutation::Permutation;
use crate::types::{MatchConfig, MatchError, MatchPair, MatchSet};

#[cfg(test)]
mod tests;

/// Find every unordered pair of fingerprints within `cfg.distance` bits.
///
/// Every returned pair `(a, b)` satisfies `a < b` and
/// `hamming(a, b) <= cfg.distance`, and every qualifying pair is found:
/// by pigeonhole, a pair differing in at most `d` of `B` blocks agrees on
/// some `B - d` blocks, and the plan enumerates every such prefix choice.
pub fn find_all(hashes: &FxHashSet<u64>, cfg: &MatchConfig) -> Result<MatchSet, MatchError> {
    cfg.validate()?;
    let permutations = Permutation::plan(cfg.blocks, cfg.distance)?;
    let corpus: Vec<u64> = hashes.iter().copied().collect();

    info!(
        hashes = corpus.len(),
        permutations = permutations.len(),
        blocks = cfg.blocks,
        distance = cfg.distance,
        "match_scan_start"
    );
    let start = Instant::now();

    let bags: Vec<Vec<MatchPair>> = if cfg.use_parallel {
        permutations
            .par_iter()
            .map(|permutation| scan_permutation(&corpus, permutation, cfg.distance))
            .collect()
    } else {
        permutations
            .iter()
            .map(|permutation| scan_permutation(&corpus, permutation, cfg.distance))
            .collect()
    };

    // Pairs rediscovered under several permutations collapse here.
    let mut matches = MatchSet::default();
    for bag in bags {
        matches.extend(bag);
    }

    info!(
        matches = matches.len(),
        elapsed_micros = start.elapsed().as_micros() as u64,
        "match_scan_done"
    );
    Ok(matches)
}

/// One permutation pass: permute, sort, sweep equal-prefix runs.
fn scan_permutation(hashes: &[u64], permutation: &Permutation, distance: u32) -> Vec<MatchPair> {
    let start = Instant::now();
    let mask = permutation.search_mask();

    let mut permuted: Vec<u64> = hashes.iter().map(|&h| permutation.apply(h)).collect();
    permuted.sort_unstable();

    let mut pairs = Vec::new();
    let mut lo = 0;
    while lo < permuted.len() {
        let prefix = permuted[lo] & mask;
        let mut hi = lo + 1;
        while hi < permuted.len() && permuted[hi] & mask == prefix {
            hi += 1;
        }

        // Permutations preserve popcount of the XOR, so distances can be
        // checked on the permuted words and only survivors un-permuted.
        for i in lo..hi {
            for j in i + 1..hi {
                if hamming(permuted[i], permuted[j]) <= distance {
                    let a = permutation.reverse(permuted[i]);
                    let b = permutation.reverse(permuted[j]);
                    pairs.push((a.min(b), a.max(b)));
                }
            }
        }
        lo = hi;
    }

    debug!(
        pairs = pairs.len(),
        elapsed_micros = start.elapsed().as_micros() as u64,
        "permutation_pass"
    );
    pairs
}
