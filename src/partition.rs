use std::fmt::Debug;
use std::hash::Hash;

use ahash::{AHashMap, AHashSet};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::config::PartitioningParams;
use crate::errors::BopError;
use crate::graph::{AttributedGraph, NodeId};

/// Set of nodes in insertion order.
pub type Partition = IndexSet<NodeId>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostType {
    /// Number of edges between two nodes, either direction.
    EdgeCount,
    Constant,
}

impl CostType {
    pub fn cost(self, graph: &AttributedGraph, a: NodeId, b: NodeId) -> Result<f64, BopError> {
        graph.check_node(a)?;
        graph.check_node(b)?;
        Ok(self.pair_cost(graph, a, b))
    }

    pub(crate) fn pair_cost(self, graph: &AttributedGraph, a: NodeId, b: NodeId) -> f64 {
        match self {
            CostType::EdgeCount => graph.edge_multiplicity(a, b) as f64,
            CostType::Constant => 1.0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Kernighan-Lin bisection of `nodes`.
///
/// The seed puts even positions in `A` and odd positions in `B`. Each
/// iteration locks `floor(n / 2)` best-gain pairs and swaps the prefix with
/// the largest positive cumulative gain. A negative `max_iterations` runs
/// until no improving prefix exists.
pub fn kernighan_lin<N, F, C>(
    nodes: &[N],
    neighbours: F,
    cost: C,
    max_iterations: i64,
) -> Result<(Vec<N>, Vec<N>), BopError>
where
    N: Copy + Eq + Hash + Debug,
    F: Fn(N) -> IndexSet<N>,
    C: Fn(N, N) -> f64,
{
    let mut a: Vec<N> = nodes.iter().step_by(2).copied().collect();
    let mut b: Vec<N> = nodes.iter().skip(1).step_by(2).copied().collect();
    let adjacency: AHashMap<N, IndexSet<N>> =
        nodes.iter().map(|node| (*node, neighbours(*node))).collect();
    let pair_cost = |x: N, y: N| -> f64 {
        match adjacency.get(&x) {
            Some(set) if set.contains(&y) => cost(x, y),
            _ => 0.0,
        }
    };

    let mut iteration: i64 = 0;
    while max_iterations < 0 || iteration < max_iterations {
        iteration += 1;
        let mut work_a = a.clone();
        let mut work_b = b.clone();
        let mut locked: AHashSet<N> = AHashSet::new();
        let mut pairs: Vec<(N, N)> = Vec::new();
        let mut gains: Vec<f64> = Vec::new();

        for _ in 0..nodes.len() / 2 {
            let sides = side_map(&work_a, &work_b);
            let d = |v: N| -> f64 {
                let own = sides.get(&v).copied();
                let mut total = 0.0;
                if let Some(set) = adjacency.get(&v) {
                    for u in set {
                        if *u == v {
                            continue;
                        }
                        match sides.get(u) {
                            Some(side) if Some(*side) == own => total -= pair_cost(v, *u),
                            Some(_) => total += pair_cost(v, *u),
                            None => {}
                        }
                    }
                }
                total
            };
            let free_a: Vec<(N, f64)> = work_a
                .iter()
                .filter(|n| !locked.contains(*n))
                .map(|n| (*n, d(*n)))
                .collect();
            let free_b: Vec<(N, f64)> = work_b
                .iter()
                .filter(|n| !locked.contains(*n))
                .map(|n| (*n, d(*n)))
                .collect();
            if free_a.is_empty() || free_b.is_empty() {
                break;
            }

            let mut best: Option<(N, N, f64)> = None;
            for (x, dx) in &free_a {
                for (y, dy) in &free_b {
                    let gain = dx + dy - 2.0 * pair_cost(*x, *y);
                    if best.is_none_or(|(_, _, g)| gain > g) {
                        best = Some((*x, *y, gain));
                    }
                }
            }
            let Some((x, y, gain)) = best else {
                return Err(BopError::invariant(format!(
                    "no maximizing pair among {} x {} candidates",
                    free_a.len(),
                    free_b.len()
                )));
            };
            locked.insert(x);
            locked.insert(y);
            pairs.push((x, y));
            gains.push(gain);
            swap_in_place(&mut work_a, &mut work_b, x, y)?;
        }

        if gains.is_empty() {
            break;
        }
        let (k, g_max) = best_prefix(&gains)?;
        tracing::trace!(iteration, k, g_max, "kernighan-lin pass");
        if g_max <= 0.0 {
            break;
        }
        for (x, y) in &pairs[..k] {
            swap_in_place(&mut a, &mut b, *x, *y)?;
        }
    }
    Ok((a, b))
}

fn side_map<N: Copy + Eq + Hash>(a: &[N], b: &[N]) -> AHashMap<N, Side> {
    a.iter()
        .map(|n| (*n, Side::A))
        .chain(b.iter().map(|n| (*n, Side::B)))
        .collect()
}

fn swap_in_place<N: Copy + Eq + Debug>(a: &mut [N], b: &mut [N], x: N, y: N) -> Result<(), BopError> {
    let pos_x = a.iter().position(|n| *n == x);
    let pos_y = b.iter().position(|n| *n == y);
    match (pos_x, pos_y) {
        (Some(i), Some(j)) => {
            a[i] = y;
            b[j] = x;
            Ok(())
        }
        _ => Err(BopError::invariant(format!(
            "swap pair ({x:?}, {y:?}) not found in its sets"
        ))),
    }
}

/// Prefix length in `1..=len` with the first maximal cumulative gain.
fn best_prefix(gains: &[f64]) -> Result<(usize, f64), BopError> {
    let mut best: Option<(usize, f64)> = None;
    let mut sum = 0.0;
    for (idx, gain) in gains.iter().enumerate() {
        sum += gain;
        if best.is_none_or(|(_, g)| sum > g) {
            best = Some((idx + 1, sum));
        }
    }
    best.ok_or_else(|| BopError::invariant("no maximizing gain prefix"))
}

/// Splits the graph into partitions of at most `max_partition_size` nodes.
pub fn partition_graph(
    graph: &AttributedGraph,
    params: &PartitioningParams,
) -> Result<Vec<Partition>, BopError> {
    let nodes: Vec<NodeId> = graph.node_ids().collect();
    partition_nodes(graph, &nodes, params)
}

/// Partitions a subset of the graph's nodes; edges leaving the subset are ignored.
pub fn partition_nodes(
    graph: &AttributedGraph,
    nodes: &[NodeId],
    params: &PartitioningParams,
) -> Result<Vec<Partition>, BopError> {
    if params.max_partition_size == 0 {
        return Err(BopError::invalid_parameter(
            "maxPartitionSize must be at least 1",
        ));
    }
    for node in nodes {
        graph.check_node(*node)?;
    }
    if params.max_partition_size == 1 {
        return Ok(nodes.iter().map(|node| Partition::from([*node])).collect());
    }
    let mut out = Vec::new();
    subdivide(graph, nodes, params, &mut out)?;
    tracing::debug!(
        nodes = nodes.len(),
        partitions = out.len(),
        "partitioned graph"
    );
    Ok(out)
}

fn subdivide(
    graph: &AttributedGraph,
    nodes: &[NodeId],
    params: &PartitioningParams,
    out: &mut Vec<Partition>,
) -> Result<(), BopError> {
    let (a, b) = kernighan_lin(
        nodes,
        |node| graph.adjacent(node),
        |x, y| params.cost_type.pair_cost(graph, x, y),
        params.max_iterations,
    )?;
    for half in [a, b] {
        if half.is_empty() {
            continue;
        }
        if half.len() <= params.max_partition_size {
            out.push(half.into_iter().collect());
        } else {
            subdivide(graph, &half, params, out)?;
        }
    }
    Ok(())
}
