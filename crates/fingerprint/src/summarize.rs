//! Simhash summarization: collapse many feature hashes into one fingerprint.

use crate::config::FingerprintError;

const FINGERPRINT_BITS: usize = 64;

/// Collapse a sequence of feature hashes into one fingerprint by per-bit
/// majority vote.
///
/// For each bit position, features voting `1` add one and features voting
/// `0` subtract one; the output bit is set iff the tally is strictly
/// positive, so ties resolve to `0`. The result depends only on the multiset
/// of features, not their order.
pub fn summarize(features: &[u64]) -> Result<u64, FingerprintError> {
    if features.is_empty() {
        return Err(FingerprintError::EmptyFeatures);
    }

    // i64 tallies cannot saturate for any in-memory feature count.
    let mut counts = [0i64; FINGERPRINT_BITS];
    for &feature in features {
        let mut bits = feature;
        for count in counts.iter_mut() {
            *count += if bits & 1 == 1 { 1 } else { -1 };
            bits >>= 1;
        }
    }

    let mut result = 0u64;
    for (i, &count) in counts.iter().enumerate() {
        if count > 0 {
            result |= 1u64 << i;
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_rejected() {
        assert_eq!(summarize(&[]), Err(FingerprintError::EmptyFeatures));
    }

    #[test]
    fn single_feature_is_identity() {
        let h = 0xFACE_0FF5_1234_5678;
        assert_eq!(summarize(&[h]).unwrap(), h);
    }

    #[test]
    fn majority_wins() {
        let all = u64::MAX;
        assert_eq!(summarize(&[all, all, 0]).unwrap(), all);
        assert_eq!(summarize(&[all, 0, 0]).unwrap(), 0);
    }

    #[test]
    fn ties_resolve_to_zero() {
        assert_eq!(summarize(&[u64::MAX, 0]).unwrap(), 0);
        assert_eq!(summarize(&[0b1100, 0b1010]).unwrap(), 0b1000);
    }

    #[test]
    fn order_invariant() {
        let features = [0xAAAA_BBBB_CCCC_DDDD, 0x1111_2222_3333_4444, 0xF0F0_F0F0_F0F0_F0F0];
        let mut reversed = features;
        reversed.reverse();
        assert_eq!(summarize(&features).unwrap(), summarize(&reversed).unwrap());
    }

    #[test]
    fn per_bit_votes_are_independent() {
        // Bit 0 has two votes for 1, bit 1 has one, bit 2 has none.
        let fp = summarize(&[0b011, 0b001, 0b100]).unwrap();
        assert_eq!(fp, 0b001);
    }
}
