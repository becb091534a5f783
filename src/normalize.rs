use ahash::AHashMap;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::config::NormalizationParams;
use crate::errors::BopError;
use crate::graph::{AttributedGraph, EdgeId, NodeId};
use crate::partition::Partition;

pub const MASKED_LABEL: &str = "<node>";

/// Maps a labeled node id to the model ids of the nodes it stood for.
pub type PatternMapping = IndexMap<String, Vec<String>>;

/// Partition-local node name; `index` is unique only among nodes with the same label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabeledNode {
    pub node: NodeId,
    pub label: String,
    pub index: usize,
}

impl LabeledNode {
    pub fn id(&self) -> String {
        format!("{}_{}", self.label, self.index)
    }
}

/// Edge between two labeled nodes; `source` and `target` index the partition's nodes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabeledEdge {
    pub edge: EdgeId,
    pub source: usize,
    pub target: usize,
    pub identifier: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedPartition {
    pub nodes: Vec<LabeledNode>,
    pub edges: Vec<LabeledEdge>,
}

impl NormalizedPartition {
    pub fn edge_identifiers(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(|edge| edge.identifier.as_str())
    }
}

/// Relabels one (restored) partition.
///
/// Nodes are taken in discovery order and grouped by type; groups keep the
/// order of their first member.
pub fn normalize_partition(
    graph: &AttributedGraph,
    partition: &Partition,
    mask_node_types: bool,
) -> Result<NormalizedPartition, BopError> {
    for node in partition {
        graph.check_node(*node)?;
    }
    let mut ordered: Vec<NodeId> = partition.iter().copied().collect();
    ordered.sort_unstable();

    let mut groups: IndexMap<&str, Vec<NodeId>> = IndexMap::new();
    for node in &ordered {
        let label = if mask_node_types {
            MASKED_LABEL
        } else {
            graph.label(*node)
        };
        groups.entry(label).or_default().push(*node);
    }

    let mut nodes = Vec::with_capacity(ordered.len());
    for (label, members) in &groups {
        for (index, node) in members.iter().enumerate() {
            nodes.push(LabeledNode {
                node: *node,
                label: label.to_string(),
                index,
            });
        }
    }

    let positions: AHashMap<NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(pos, labeled)| (labeled.node, pos))
        .collect();
    let mut edges = Vec::new();
    for (source_pos, labeled) in nodes.iter().enumerate() {
        for edge in graph.outgoing(labeled.node) {
            let record = graph.edge(*edge);
            if !partition.contains(&record.target) {
                continue;
            }
            let Some(target_pos) = positions.get(&record.target).copied() else {
                return Err(BopError::invariant(format!(
                    "target {} of edge {edge} missing from labeled nodes",
                    record.target
                )));
            };
            let identifier = format!(
                "{}>{}[{}]",
                labeled.id(),
                nodes[target_pos].id(),
                record.tag
            );
            edges.push(LabeledEdge {
                edge: *edge,
                source: source_pos,
                target: target_pos,
                identifier,
            });
        }
    }
    Ok(NormalizedPartition { nodes, edges })
}

/// Normalizes every partition and merges their labeled-id mappings.
pub fn normalize_partitions(
    graph: &AttributedGraph,
    partitions: &[Partition],
    params: &NormalizationParams,
) -> Result<(Vec<NormalizedPartition>, PatternMapping), BopError> {
    let mut normalized = Vec::with_capacity(partitions.len());
    let mut merged: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for partition in partitions {
        let labeled = normalize_partition(graph, partition, params.mask_node_types)?;
        for node in &labeled.nodes {
            let entry = merged.entry(node.id()).or_default();
            if let Some(id) = &graph.node(node.node).id {
                entry.insert(id.clone());
            }
        }
        normalized.push(labeled);
    }
    let mapping = merged
        .into_iter()
        .map(|(key, ids)| (key, ids.into_iter().collect()))
        .collect();
    Ok((normalized, mapping))
}
