use serde::{Deserialize, Serialize};

use crate::encoding::EncodedPath;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeFeature {
    PathCount,
    PathWeight,
}

/// Per-node path statistics; absent features are `None`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeFeatures {
    pub node: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_count: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_weight: Option<Vec<f64>>,
}

/// Summarizes `paths` for nodes `0..node_count`, grouping paths by start node.
///
/// `path_count[i]` counts paths with `i + 1` steps and has one entry per step
/// of the longest path. `path_weight` lists path weights, zero-padded to the
/// largest per-node path count.
pub fn summarize_nodes(
    node_count: usize,
    paths: &[EncodedPath],
    features: &[NodeFeature],
) -> Vec<NodeFeatures> {
    let mut by_start: Vec<Vec<&EncodedPath>> = vec![Vec::new(); node_count];
    for path in paths {
        if let Some(start) = path.start_index() {
            if let Some(bucket) = by_start.get_mut(start) {
                bucket.push(path);
            }
        }
    }
    let longest = paths.iter().map(EncodedPath::len).max().unwrap_or(0);
    let highest = by_start.iter().map(Vec::len).max().unwrap_or(0);
    let want_count = features.contains(&NodeFeature::PathCount);
    let want_weight = features.contains(&NodeFeature::PathWeight);

    by_start
        .iter()
        .enumerate()
        .map(|(node, own)| NodeFeatures {
            node,
            path_count: want_count.then(|| path_counts(own, longest)),
            path_weight: want_weight.then(|| path_weights(own, highest)),
        })
        .collect()
}

fn path_counts(paths: &[&EncodedPath], longest: usize) -> Vec<usize> {
    let mut counts = vec![0; longest];
    for path in paths {
        if let Some(slot) = path.len().checked_sub(1).and_then(|idx| counts.get_mut(idx)) {
            *slot += 1;
        }
    }
    counts
}

fn path_weights(paths: &[&EncodedPath], highest: usize) -> Vec<f64> {
    let mut weights: Vec<f64> = paths.iter().map(|path| path.weight.scalar()).collect();
    weights.resize(highest, 0.0);
    weights
}
