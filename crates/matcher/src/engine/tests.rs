use super::*;

use crate::cluster::find_clusters;

fn corpus(hashes: &[u64]) -> FxHashSet<u64> {
    hashes.iter().copied().collect()
}

fn sequential(blocks: u32, distance: u32) -> MatchConfig {
    MatchConfig {
        blocks,
        distance,
        use_parallel: false,
    }
}

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Flip `flips` distinct bits of `hash`.
fn perturb(hash: u64, flips: u32, state: &mut u64) -> u64 {
    let mut result = hash;
    let mut flipped = 0;
    while flipped < flips {
        let bit = 1u64 << (splitmix64(state) % 64);
        if result & bit == hash & bit {
            result ^= bit;
            flipped += 1;
        }
    }
    result
}

#[test]
fn lone_hash_matches_nothing() {
    let hashes = corpus(&[0x0]);
    let cfg = sequential(4, 1);
    assert!(find_all(&hashes, &cfg).unwrap().is_empty());
    assert!(find_clusters(&hashes, &cfg).unwrap().is_empty());
}

#[test]
fn one_bit_neighbors_match() {
    let hashes = corpus(&[0x0, 0x1]);
    let cfg = sequential(4, 1);

    let matches = find_all(&hashes, &cfg).unwrap();
    assert_eq!(matches, [(0x0, 0x1)].into_iter().collect());

    let clusters = find_clusters(&hashes, &cfg).unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0], corpus(&[0x0, 0x1]));
}

#[test]
fn distance_threshold_is_exact() {
    // 0x0 and 0x3 differ in exactly two bits.
    let hashes = corpus(&[0x0, 0x3]);

    assert!(find_all(&hashes, &sequential(4, 1)).unwrap().is_empty());
    assert_eq!(
        find_all(&hashes, &sequential(4, 2)).unwrap(),
        [(0x0, 0x3)].into_iter().collect()
    );
}

#[test]
fn transitive_matches_form_one_cluster() {
    // 0x0-0x1 and 0x1-0x3 are within one bit; 0x0-0x3 is not.
    let hashes = corpus(&[0x0, 0x1, 0x3]);
    let cfg = sequential(4, 1);

    let matches = find_all(&hashes, &cfg).unwrap();
    assert_eq!(matches, [(0x0, 0x1), (0x1, 0x3)].into_iter().collect());

    let clusters = find_clusters(&hashes, &cfg).unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0], corpus(&[0x0, 0x1, 0x3]));
}

#[test]
fn far_apart_groups_stay_separate() {
    let hashes = corpus(&[0x0, 0x1, 0xFF00, 0xFF01]);
    let cfg = sequential(4, 1);

    let matches = find_all(&hashes, &cfg).unwrap();
    assert_eq!(
        matches,
        [(0x0, 0x1), (0xFF00, 0xFF01)].into_iter().collect()
    );

    let mut clusters = find_clusters(&hashes, &cfg).unwrap();
    clusters.sort_by_key(|c| *c.iter().min().unwrap());
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0], corpus(&[0x0, 0x1]));
    assert_eq!(clusters[1], corpus(&[0xFF00, 0xFF01]));
}

#[test]
fn every_planted_pair_is_found() {
    for (blocks, distance) in [(4u32, 1u32), (6, 3), (8, 2)] {
        let mut state = 0xC0FF_EE00_0000_0000u64 + (blocks * 131 + distance) as u64;
        let mut hashes = FxHashSet::default();
        let mut planted = Vec::new();

        for _ in 0..64 {
            let base = splitmix64(&mut state);
            let flips = 1 + (splitmix64(&mut state) % distance as u64) as u32;
            let twin = perturb(base, flips, &mut state);
            hashes.insert(base);
            hashes.insert(twin);
            planted.push((base.min(twin), base.max(twin)));
        }
        // Background noise that is overwhelmingly far from everything.
        for _ in 0..256 {
            hashes.insert(splitmix64(&mut state));
        }

        let matches = find_all(&hashes, &sequential(blocks, distance)).unwrap();
        for pair in &planted {
            assert!(
                matches.contains(pair),
                "pair {pair:?} missed at B={blocks} d={distance}"
            );
        }
    }
}

#[test]
fn all_reported_pairs_are_sound() {
    let mut state = 7u64;
    let mut hashes = FxHashSet::default();
    for _ in 0..128 {
        let base = splitmix64(&mut state);
        hashes.insert(base);
        hashes.insert(perturb(base, 2, &mut state));
    }

    let cfg = sequential(6, 3);
    for &(a, b) in &find_all(&hashes, &cfg).unwrap() {
        assert!(a < b);
        assert!(hamming(a, b) <= cfg.distance);
        assert!(hashes.contains(&a) && hashes.contains(&b));
    }
}

#[test]
fn parallel_and_sequential_agree() {
    let mut state = 99u64;
    let mut hashes = FxHashSet::default();
    for _ in 0..200 {
        let base = splitmix64(&mut state);
        hashes.insert(base);
        hashes.insert(perturb(base, 1, &mut state));
    }

    let sequential_cfg = sequential(6, 3);
    let parallel_cfg = MatchConfig::new(6, 3);
    assert_eq!(
        find_all(&hashes, &sequential_cfg).unwrap(),
        find_all(&hashes, &parallel_cfg).unwrap()
    );
}

#[test]
fn repeated_runs_are_identical() {
    let mut state = 5u64;
    let mut hashes = FxHashSet::default();
    for _ in 0..100 {
        hashes.insert(splitmix64(&mut state) & 0xFFFF);
    }

    let cfg = sequential(5, 2);
    assert_eq!(find_all(&hashes, &cfg).unwrap(), find_all(&hashes, &cfg).unwrap());

    let normalize = |mut clusters: Vec<crate::types::Cluster>| {
        let mut sorted: Vec<Vec<u64>> = clusters
            .drain(..)
            .map(|c| {
                let mut v: Vec<u64> = c.into_iter().collect();
                v.sort_unstable();
                v
            })
            .collect();
        sorted.sort();
        sorted
    };
    assert_eq!(
        normalize(find_clusters(&hashes, &cfg).unwrap()),
        normalize(find_clusters(&hashes, &cfg).unwrap())
    );
}

#[test]
fn clusters_partition_the_matched_vertices() {
    let mut state = 31u64;
    let mut hashes = FxHashSet::default();
    for _ in 0..150 {
        let base = splitmix64(&mut state);
        hashes.insert(base);
        hashes.insert(perturb(base, 1, &mut state));
        hashes.insert(perturb(base, 2, &mut state));
    }

    let cfg = sequential(6, 3);
    let matches = find_all(&hashes, &cfg).unwrap();
    let clusters = find_clusters(&hashes, &cfg).unwrap();

    let mut membership: fxhash::FxHashMap<u64, usize> = fxhash::FxHashMap::default();
    for (cluster_id, cluster) in clusters.iter().enumerate() {
        assert!(cluster.len() >= 2, "no empty or singleton clusters");
        for &hash in cluster {
            // Pairwise disjoint: no vertex appears in two clusters.
            assert!(membership.insert(hash, cluster_id).is_none());
        }
    }

    // The clusters cover exactly the vertices that matched something, and
    // every edge stays inside one cluster.
    let mut matched = FxHashSet::default();
    for &(a, b) in &matches {
        matched.insert(a);
        matched.insert(b);
        assert_eq!(membership[&a], membership[&b]);
    }
    assert_eq!(matched.len(), membership.len());
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let hashes = corpus(&[0x0, 0x1]);
    assert!(find_all(&hashes, &sequential(4, 0)).is_err());
    assert!(find_all(&hashes, &sequential(3, 3)).is_err());
    assert!(find_clusters(&hashes, &sequential(65, 1)).is_err());
}

#[test]
fn empty_corpus_yields_empty_results() {
    let hashes = FxHashSet::default();
    let cfg = sequential(4, 1);
    assert!(find_all(&hashes, &cfg).unwrap().is_empty());
    assert!(find_clusters(&hashes, &cfg).unwrap().is_empty());
}
