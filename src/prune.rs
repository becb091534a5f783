use serde::{Deserialize, Serialize};

use crate::encoding::EncodedPath;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PruneMethod {
    None,
    /// Nodes match on token and original index.
    Node,
    /// Nodes match on token only.
    Encoding,
}

/// Removes paths contained in another path; survivors keep their order.
pub fn prune_paths(paths: Vec<EncodedPath>, method: PruneMethod) -> Vec<EncodedPath> {
    if method == PruneMethod::None {
        return paths;
    }
    let mut pruned = vec![false; paths.len()];
    for i in 0..paths.len() {
        if pruned[i] {
            continue;
        }
        for j in 0..paths.len() {
            if j == i || pruned[j] {
                continue;
            }
            let (a, b) = (&paths[i], &paths[j]);
            if b.nodes.len() > a.nodes.len() && is_subpath(a, b, method) {
                pruned[i] = true;
                break;
            }
            if a.nodes.len() >= b.nodes.len() && is_subpath(b, a, method) {
                pruned[j] = true;
            }
        }
    }
    let before = paths.len();
    let kept: Vec<EncodedPath> = paths
        .into_iter()
        .zip(pruned)
        .filter_map(|(path, gone)| (!gone).then_some(path))
        .collect();
    tracing::debug!(before, after = kept.len(), ?method, "pruned paths");
    kept
}

/// True when `short` occurs as a contiguous run inside `long`.
///
/// The edge leaving a matched node must match too, except after the last
/// node of `short`.
pub fn is_subpath(short: &EncodedPath, long: &EncodedPath, method: PruneMethod) -> bool {
    let last = short.nodes.len().saturating_sub(1);
    for offset in 0..long.nodes.len() {
        for (step, short_node) in short.nodes.iter().enumerate() {
            let Some(long_node) = long.nodes.get(offset + step) else {
                return false;
            };
            let short_edge = short.edges.get(step);
            let long_edge = long.edges.get(offset + step);
            let edge_matches = short_edge == long_edge || (short_edge.is_none() && step == last);
            if !(same_node(short_node, long_node, method) && edge_matches) {
                break;
            }
            if step == last {
                return true;
            }
        }
    }
    false
}

fn same_node(
    a: &(usize, Option<String>),
    b: &(usize, Option<String>),
    method: PruneMethod,
) -> bool {
    let same_token = a.1 == b.1;
    match method {
        PruneMethod::Encoding => same_token,
        PruneMethod::Node | PruneMethod::None => same_token && a.0 == b.0,
    }
}
