use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{PathEncoderConfig, PatternMinerConfig};
use crate::embedding::{Embedding, embed_partitions};
use crate::encoding::{EncodedPath, encode_paths};
use crate::errors::BopError;
use crate::frequency::{PatternWithFrequency, calculate_frequencies};
use crate::graph::AttributedGraph;
use crate::mining::{MinedPattern, mine_patterns};
use crate::normalize::{PatternMapping, normalize_partitions};
use crate::partition::partition_graph;
use crate::paths::collect_paths;
use crate::prune::prune_paths;
use crate::restore::restore_partitions;
use crate::summary::{NodeFeatures, summarize_nodes};

/// Failure of a single batch item; siblings are unaffected.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("item {index}: {message}")]
pub struct ItemError {
    pub index: usize,
    pub message: String,
}

impl ItemError {
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}

pub type GraphOrError = Result<AttributedGraph, ItemError>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEncoding {
    pub paths: Vec<EncodedPath>,
    pub nodes: Vec<NodeFeatures>,
    /// Model id per node index.
    pub mapping: Vec<Option<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionEmbedding {
    pub mapping: PatternMapping,
    pub embedding: Embedding,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphPatterns {
    pub mapping: PatternMapping,
    pub embedding: Embedding,
    pub patterns: Vec<MinedPattern>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatternMinerOutput {
    pub items: Vec<Result<GraphPatterns, ItemError>>,
    pub frequencies: Vec<PatternWithFrequency>,
}

/// Path variant: collect, encode, prune and summarize every graph.
#[tracing::instrument(skip_all, fields(items = batch.len()))]
pub fn run_path_encoder(
    batch: &[GraphOrError],
    config: &PathEncoderConfig,
) -> Result<Vec<Result<PathEncoding, ItemError>>, BopError> {
    let templates = config.validate()?;
    let mut out = Vec::with_capacity(batch.len());
    for item in batch {
        let graph = match item {
            Ok(graph) => graph,
            Err(err) => {
                tracing::debug!(index = err.index, "skipping failed item");
                out.push(Err(err.clone()));
                continue;
            }
        };
        let paths = collect_paths(graph, &config.paths)?;
        let encoded = encode_paths(graph, &paths, &templates, |node| node.index())?;
        let pruned = prune_paths(encoded, config.prune_method);
        let nodes = summarize_nodes(graph.node_count(), &pruned, &config.node_features);
        let mapping = graph.node_ids().map(|id| graph.node(id).id.clone()).collect();
        out.push(Ok(PathEncoding {
            paths: pruned,
            nodes,
            mapping,
        }));
    }
    Ok(out)
}

/// Partition, restore, normalize and embed one graph.
pub fn embed_graph(
    graph: &AttributedGraph,
    config: &PatternMinerConfig,
) -> Result<PartitionEmbedding, BopError> {
    let partitions = partition_graph(graph, &config.partitioning)?;
    let restored = restore_partitions(graph, &partitions)?;
    let (normalized, mapping) = normalize_partitions(graph, &restored, &config.normalization)?;
    Ok(PartitionEmbedding {
        mapping,
        embedding: embed_partitions(&normalized),
    })
}

/// Pattern variant: mine every graph, then rank patterns across the batch.
#[tracing::instrument(skip_all, fields(items = batch.len()))]
pub fn run_pattern_miner(
    batch: &[GraphOrError],
    config: &PatternMinerConfig,
) -> Result<PatternMinerOutput, BopError> {
    config.validate()?;
    let mut items = Vec::with_capacity(batch.len());
    for item in batch {
        let graph = match item {
            Ok(graph) => graph,
            Err(err) => {
                tracing::debug!(index = err.index, "skipping failed item");
                items.push(Err(err.clone()));
                continue;
            }
        };
        let PartitionEmbedding { mapping, embedding } = embed_graph(graph, config)?;
        let patterns = mine_patterns(&embedding, &config.mining)?;
        items.push(Ok(GraphPatterns {
            mapping,
            embedding,
            patterns,
        }));
    }
    let frequencies = calculate_frequencies(
        items
            .iter()
            .filter_map(|item| item.as_ref().ok())
            .map(|item| item.patterns.as_slice()),
        &config.frequency,
    );
    Ok(PatternMinerOutput { items, frequencies })
}
