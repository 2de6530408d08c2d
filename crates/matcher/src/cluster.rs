//! Connected-component clustering over the match graph.

use std::collections::VecDeque;

use fxhash::{FxHashMap, FxHashSet};
use tracing::info;

use crate::engine::find_all;
use crate::types::{Cluster, MatchConfig, MatchError};

/// Group near-duplicate fingerprints into connected components.
///
/// Runs [`find_all`] and then walks the resulting undirected graph with a
/// breadth-first search from each unvisited vertex. Fingerprints that match
/// nothing never enter the graph, so no singleton clusters are emitted. The
/// returned clusters are non-empty, pairwise disjoint, and unordered.
pub fn find_clusters(
    hashes: &FxHashSet<u64>,
    cfg: &MatchConfig,
) -> Result<Vec<Cluster>, MatchError> {
    let matches = find_all(hashes, cfg)?;

    let mut adjacency: FxHashMap<u64, FxHashSet<u64>> = FxHashMap::default();
    for &(a, b) in &matches {
        adjacency.entry(a).or_default().insert(b);
        adjacency.entry(b).or_default().insert(a);
    }

    let mut visited: FxHashSet<u64> = FxHashSet::default();
    let mut clusters = Vec::new();
    for &vertex in adjacency.keys() {
        if visited.contains(&vertex) {
            continue;
        }

        let mut cluster = Cluster::default();
        let mut frontier = VecDeque::from([vertex]);
        visited.insert(vertex);
        while let Some(current) = frontier.pop_front() {
            cluster.insert(current);
            for &neighbor in &adjacency[&current] {
                if visited.insert(neighbor) {
                    frontier.push_back(neighbor);
                }
            }
        }
        clusters.push(cluster);
    }

    info!(
        matches = matches.len(),
        clusters = clusters.len(),
        "clusters_built"
    );
    Ok(clusters)
}
