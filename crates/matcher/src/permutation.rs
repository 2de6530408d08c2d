//! Blocked bit permutations over 64-bit fingerprints.
//!
//! A permutation rearranges whole contiguous bit blocks so that a chosen
//! subset of blocks occupies the most-significant positions of the output.
//! By pigeonhole, two fingerprints within Hamming distance `d` agree on at
//! least `blocks - d` of the blocks exactly, so enumerating every choice of
//! `blocks - d` "prefix" blocks guarantees each near-duplicate pair shares
//! the permuted prefix under at least one permutation.

use crate::types::{MatchError, FINGERPRINT_BITS};

/// A bijection on 64-bit words defined by an ordered list of block masks.
///
/// The blocks are concatenated into the output from bit 63 downward, in the
/// order the masks were given. Applying a permutation and then reversing it
/// is the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    /// Block masks in output order, prefix blocks first.
    forward_masks: Vec<u64>,
    /// Each forward mask after its shift, i.e. the block's mask in
    /// output space. Lets `reverse` reuse the same offsets.
    reverse_masks: Vec<u64>,
    /// Signed shift per block; positive shifts left.
    offsets: Vec<i32>,
    /// Ones in exactly the output positions covered by the prefix blocks.
    search_mask: u64,
}

impl Permutation {
    /// Build the full list of permutations needed to find every pair within
    /// `distance` bits under a `blocks`-way partition.
    ///
    /// One permutation is produced per choice of `blocks - distance` prefix
    /// blocks, in lexicographic order of block indices, so the list has
    /// `C(blocks, blocks - distance)` entries. The output is deterministic
    /// for a given `(blocks, distance)`.
    pub fn plan(blocks: u32, distance: u32) -> Result<Vec<Permutation>, MatchError> {
        if distance == 0 {
            return Err(MatchError::InvalidConfig(
                "distance must be at least 1".into(),
            ));
        }
        if blocks > FINGERPRINT_BITS {
            return Err(MatchError::InvalidConfig(format!(
                "blocks ({blocks}) must not exceed {FINGERPRINT_BITS}"
            )));
        }
        if blocks <= distance {
            return Err(MatchError::InvalidConfig(format!(
                "blocks ({blocks}) must be greater than distance ({distance})"
            )));
        }

        let masks = block_masks(blocks);
        let prefix_len = (blocks - distance) as usize;

        let mut permutations = Vec::new();
        for choice in combinations(masks.len(), prefix_len) {
            let mut chosen = vec![false; masks.len()];
            let mut ordered = Vec::with_capacity(masks.len());
            for &index in &choice {
                chosen[index] = true;
                ordered.push(masks[index]);
            }
            // The complementary blocks follow in their natural index order.
            for (index, &mask) in masks.iter().enumerate() {
                if !chosen[index] {
                    ordered.push(mask);
                }
            }
            permutations.push(Permutation::from_masks(distance, &ordered)?);
        }
        Ok(permutations)
    }

    /// Construct one permutation from an ordered block-mask list.
    ///
    /// The masks must each be a non-empty contiguous run of bits, pairwise
    /// disjoint, and together cover all 64 bit positions; `distance` must be
    /// at least 1 and leave at least one block in the prefix.
    pub fn from_masks(distance: u32, masks: &[u64]) -> Result<Permutation, MatchError> {
        if distance == 0 || distance as usize >= masks.len() {
            return Err(MatchError::InvalidConfig(format!(
                "distance ({distance}) must be in 1..{}",
                masks.len()
            )));
        }

        let mut covered = 0u64;
        let mut widths = Vec::with_capacity(masks.len());
        let mut offsets = Vec::with_capacity(masks.len());
        let mut reverse_masks = Vec::with_capacity(masks.len());

        // Running total of block widths placed so far; after processing a
        // mask, its lowest bit sits at output position `64 - total_width`.
        let mut total_width = 0i32;
        for &mask in masks {
            if mask == 0 {
                return Err(MatchError::InvalidConfig("empty block mask".into()));
            }
            let lo = mask.trailing_zeros() as i32;
            let width = (64 - mask.leading_zeros()) as i32 - lo;
            if mask >> lo != low_bits(width as u32) {
                return Err(MatchError::InvalidConfig(format!(
                    "block mask {mask:#018x} is not a contiguous bit run"
                )));
            }
            if covered & mask != 0 {
                return Err(MatchError::InvalidConfig(format!(
                    "block mask {mask:#018x} overlaps another block"
                )));
            }
            covered |= mask;

            total_width += width;
            let offset = 64 - total_width - lo;
            offsets.push(offset);
            reverse_masks.push(shift(mask, offset));
            widths.push(width as u32);
        }
        if covered != u64::MAX {
            return Err(MatchError::InvalidConfig(
                "block masks do not cover all 64 bits".into(),
            ));
        }

        // The prefix is everything except the last `distance` blocks; with
        // distance >= 1 its width lands in 1..=63, so the shifts below stay
        // in range.
        let prefix_width: u32 = widths[..masks.len() - distance as usize].iter().sum();
        let search_mask = low_bits(prefix_width) << (64 - prefix_width);

        Ok(Permutation {
            forward_masks: masks.to_vec(),
            reverse_masks,
            offsets,
            search_mask,
        })
    }

    /// Apply this permutation.
    #[inline]
    pub fn apply(&self, hash: u64) -> u64 {
        let mut result = 0u64;
        for (&mask, &offset) in self.forward_masks.iter().zip(&self.offsets) {
            result |= shift(hash & mask, offset);
        }
        result
    }

    /// Invert this permutation, recovering the original word.
    #[inline]
    pub fn reverse(&self, hash: u64) -> u64 {
        let mut result = 0u64;
        for (&mask, &offset) in self.reverse_masks.iter().zip(&self.offsets) {
            result |= shift(hash & mask, -offset);
        }
        result
    }

    /// Mask selecting the output bit positions of the prefix blocks.
    ///
    /// Two permuted words that agree under this mask agree exactly on every
    /// prefix block of the original words.
    #[inline]
    pub fn search_mask(&self) -> u64 {
        self.search_mask
    }
}

/// `x` shifted left by `k` when `k >= 0`, right by `-k` otherwise.
#[inline]
fn shift(x: u64, k: i32) -> u64 {
    if k >= 0 {
        x << k
    } else {
        x >> -k
    }
}

/// A mask of the lowest `width` bits.
#[inline]
fn low_bits(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Partition the 64 bit positions into `blocks` contiguous masks, block `i`
/// covering positions `[i * 64 / blocks, (i + 1) * 64 / blocks)`.
///
/// When `blocks` does not divide 64, adjacent widths differ by one.
fn block_masks(blocks: u32) -> Vec<u64> {
    (0..blocks as u64)
        .map(|i| {
            let start = (i * 64 / blocks as u64) as u32;
            let end = ((i + 1) * 64 / blocks as u64) as u32;
            low_bits(end - start) << start
        })
        .collect()
}

/// Every `r`-element subset of `0..n`, in lexicographic order.
fn combinations(n: usize, r: usize) -> Vec<Vec<usize>> {
    debug_assert!(r >= 1 && r <= n);
    let mut indices: Vec<usize> = (0..r).collect();
    let mut results = vec![indices.clone()];

    loop {
        // Find the rightmost index that can still be advanced.
        let Some(i) = (0..r).rev().find(|&i| indices[i] != i + n - r) else {
            return results;
        };
        indices[i] += 1;
        for j in i + 1..r {
            indices[j] = indices[j - 1] + 1;
        }
        results.push(indices.clone());
    }
}
