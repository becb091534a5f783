//! Bag-of-paths and frequent-pattern feature encoding for typed attributed graphs.
//!
//! Two pipelines share the template language and the bounded graph algorithms:
//! paths are collected, encoded, pruned and summarized per node, or the graph
//! is partitioned, relabeled and mined for frequent closed edge patterns.
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod bench_utils;
pub mod cache;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod encoding;
pub mod errors;
pub mod frequency;
pub mod graph;
pub mod mining;
pub mod normalize;
pub mod partition;
pub mod paths;
pub mod pipeline;
pub mod prune;
pub mod restore;
pub mod summary;
pub mod template;

pub use crate::config::{PathEncoderConfig, PatternMinerConfig};
pub use crate::errors::BopError;
pub use crate::graph::{AttributedGraph, EdgeId, ElementRef, GraphBuilder, GraphDocument, NodeId};
pub use crate::pipeline::{
    GraphOrError, ItemError, PathEncoding, PatternMinerOutput, run_path_encoder,
    run_pattern_miner,
};
pub use crate::template::{PathContext, Template, TemplateError, compile_edge_template, compile_node_template};
