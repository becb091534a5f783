use bopgraph::config::{PathParams, TemplateParams};
use bopgraph::encoding::{EncodedPath, encode_paths};
use bopgraph::graph::AttributedGraph;
use bopgraph::paths::{PathWeight, collect_paths};
use bopgraph::summary::{NodeFeature, summarize_nodes};

#[path = "fixtures.rs"]
mod fixtures;

fn encoded(graph: &AttributedGraph, params: &PathParams) -> Vec<EncodedPath> {
    let compiled = TemplateParams::default().compile().unwrap();
    let paths = collect_paths(graph, params).unwrap();
    encode_paths(graph, &paths, &compiled, |id| id.index()).unwrap()
}

#[test]
fn test_counts_indexed_by_length() {
    let graph = fixtures::chain_graph(&[("a", "b"), ("b", "c"), ("c", "d")]);
    let paths = encoded(&graph, &PathParams::default());
    let summary = summarize_nodes(
        graph.node_count(),
        &paths,
        &[NodeFeature::PathCount, NodeFeature::PathWeight],
    );
    assert_eq!(summary.len(), 5);
    let counts: Vec<Vec<usize>> = summary
        .iter()
        .map(|s| s.path_count.clone().unwrap())
        .collect();
    assert_eq!(
        counts,
        vec![
            vec![0, 0, 0],
            vec![0, 0, 1],
            vec![0, 1, 0],
            vec![1, 0, 0],
            vec![0, 0, 0],
        ]
    );
    let weights: Vec<Vec<f64>> = summary
        .iter()
        .map(|s| s.path_weight.clone().unwrap())
        .collect();
    assert_eq!(
        weights,
        vec![vec![0.0], vec![3.0], vec![2.0], vec![1.0], vec![0.0]]
    );
}

#[test]
fn test_weights_padded_to_busiest_node() {
    let graph = fixtures::chain_graph(&[("a", "b"), ("a", "c")]);
    let paths = encoded(&graph, &PathParams::default());
    let summary = summarize_nodes(graph.node_count(), &paths, &[NodeFeature::PathWeight]);
    assert_eq!(summary[1].path_weight, Some(vec![1.0, 1.0]));
    assert_eq!(summary[2].path_weight, Some(vec![0.0, 0.0]));
    assert!(summary.iter().all(|s| s.path_count.is_none()));
}

#[test]
fn test_vector_weights_are_summed() {
    let graph = fixtures::chain_graph(&[("a", "b"), ("a", "b"), ("b", "c")]);
    let params = PathParams {
        path_weight: PathWeight::None,
        ..PathParams::default()
    };
    let paths = encoded(&graph, &params);
    let summary = summarize_nodes(graph.node_count(), &paths, &[NodeFeature::PathWeight]);
    assert_eq!(summary[1].path_weight, Some(vec![3.0]));
}

#[test]
fn test_no_paths_no_features() {
    let graph = fixtures::chain_graph(&[]);
    let summary = summarize_nodes(graph.node_count(), &[], &[]);
    assert_eq!(summary.len(), 5);
    assert!(summary
        .iter()
        .all(|s| s.path_count.is_none() && s.path_weight.is_none()));
    let json = serde_json::to_value(&summary[0]).unwrap();
    assert_eq!(json, serde_json::json!({ "node": 0 }));
}
