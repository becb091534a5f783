use serde::{Deserialize, Serialize};

use crate::cache::{CacheStats, ContextCache};
use crate::config::CompiledTemplates;
use crate::errors::BopError;
use crate::graph::{AttributedGraph, EdgeId, ElementRef, NodeId};
use crate::paths::{Path, PathWeightValue};
use crate::template::{PathContext, first_token};

/// Token for one element; `None` when no template applied.
pub type EncodedMember = Option<String>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedPath {
    /// `(original node index, token)` per step.
    pub nodes: Vec<(usize, EncodedMember)>,
    /// Token of the edge entering each step after the first.
    pub edges: Vec<EncodedMember>,
    pub weight: PathWeightValue,
    pub step_weights: Vec<f64>,
}

impl EncodedPath {
    /// Number of edges in the path.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn start_index(&self) -> Option<usize> {
        self.nodes.first().map(|(index, _)| *index)
    }
}

/// Applies compiled templates to paths, evaluating each (context, element)
/// pair at most once.
pub struct PathEncoder<'a> {
    graph: &'a AttributedGraph,
    templates: &'a CompiledTemplates,
    node_cache: ContextCache<NodeId, EncodedMember>,
    edge_cache: ContextCache<EdgeId, EncodedMember>,
}

impl<'a> PathEncoder<'a> {
    pub fn new(graph: &'a AttributedGraph, templates: &'a CompiledTemplates) -> Self {
        Self {
            graph,
            templates,
            node_cache: ContextCache::new(),
            edge_cache: ContextCache::new(),
        }
    }

    pub fn encode<F: Fn(NodeId) -> usize>(
        &mut self,
        path: &Path,
        get_index: &F,
    ) -> Result<EncodedPath, BopError> {
        let graph = self.graph;
        let templates = self.templates;
        let length = path.steps.len().saturating_sub(1);
        let mut nodes = Vec::with_capacity(path.steps.len());
        let mut edges = Vec::with_capacity(length);
        for (step, entry) in path.steps.iter().enumerate() {
            graph.check_node(entry.node)?;
            let context = PathContext::new(step, length);
            if let Some(via) = entry.via {
                graph.get_edge(via)?;
                let token = self.edge_cache.compute(context, via, || {
                    first_token(
                        &templates.edge_templates,
                        graph,
                        ElementRef::Edge(via),
                        context,
                    )
                });
                edges.push(token);
            }
            let node = entry.node;
            let token = self.node_cache.compute(context, node, || {
                first_token(
                    &templates.node_templates,
                    graph,
                    ElementRef::Node(node),
                    context,
                )
            });
            nodes.push((get_index(node), token));
        }
        Ok(EncodedPath {
            nodes,
            edges,
            weight: path.weight.clone(),
            step_weights: path.step_weights.clone(),
        })
    }

    pub fn node_cache_stats(&self) -> CacheStats {
        self.node_cache.stats()
    }

    pub fn edge_cache_stats(&self) -> CacheStats {
        self.edge_cache.stats()
    }
}

/// Encodes `paths` with a cache private to this call.
pub fn encode_paths<F: Fn(NodeId) -> usize>(
    graph: &AttributedGraph,
    paths: &[Path],
    templates: &CompiledTemplates,
    get_index: F,
) -> Result<Vec<EncodedPath>, BopError> {
    let mut encoder = PathEncoder::new(graph, templates);
    let encoded = paths
        .iter()
        .map(|path| encoder.encode(path, &get_index))
        .collect::<Result<Vec<_>, _>>()?;
    let nodes = encoder.node_cache_stats();
    let edges = encoder.edge_cache_stats();
    tracing::debug!(
        paths = encoded.len(),
        node_hits = nodes.hits,
        node_misses = nodes.misses,
        edge_hits = edges.hits,
        edge_misses = edges.misses,
        "encoded paths"
    );
    Ok(encoded)
}
