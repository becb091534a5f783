use std::cmp::Ordering;

use bopgraph::BopError;
use bopgraph::config::PathParams;
use bopgraph::graph::AttributedGraph;
use bopgraph::paths::{
    Path, PathWeight, PathWeightValue, SortOrder, StepWeight, collect_paths, collect_paths_with,
    reduce_weights,
};

#[path = "fixtures.rs"]
mod fixtures;

fn node_ids(graph: &AttributedGraph, path: &Path) -> Vec<String> {
    path.nodes()
        .map(|id| graph.get_node(id).unwrap().id.clone().unwrap())
        .collect()
}

fn chain() -> AttributedGraph {
    fixtures::chain_graph(&[("a", "b"), ("a", "b"), ("b", "c"), ("c", "d")])
}

#[test]
fn test_maximal_paths_sorted_by_length_desc() {
    let graph = chain();
    let paths = collect_paths(&graph, &PathParams::default()).unwrap();
    let listed: Vec<Vec<String>> = paths.iter().map(|p| node_ids(&graph, p)).collect();
    assert_eq!(
        listed,
        vec![
            vec!["a", "b", "c", "d"],
            vec!["b", "c", "d"],
            vec!["c", "d"],
        ]
    );
    assert_eq!(paths[0].weight, PathWeightValue::Total(3.0));
    assert_eq!(paths[0].step_weights, vec![2.0, 1.0, 1.0]);
}

#[test]
fn test_parallel_edges_form_one_step() {
    let graph = fixtures::chain_graph(&[("a", "b"), ("a", "b")]);
    let paths = collect_paths(&graph, &PathParams::default()).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(node_ids(&graph, &paths[0]), vec!["a", "b"]);
    assert_eq!(paths[0].step_weights, vec![2.0]);
    let step = &paths[0].steps[1];
    assert_eq!(step.edges.len(), 2);
    assert_eq!(step.via, step.edges.first().copied());
    assert!(paths[0].steps[0].via.is_none());
}

#[test]
fn test_weight_reduction_policies() {
    let weights = [2.0, 1.0];
    assert_eq!(reduce_weights(&weights, PathWeight::Sum), PathWeightValue::Total(3.0));
    assert_eq!(reduce_weights(&weights, PathWeight::Product), PathWeightValue::Total(2.0));
    assert_eq!(reduce_weights(&weights, PathWeight::Length), PathWeightValue::Total(2.0));
    assert_eq!(
        reduce_weights(&weights, PathWeight::None),
        PathWeightValue::Steps(vec![2.0, 1.0])
    );
    assert_eq!(reduce_weights(&[], PathWeight::Product), PathWeightValue::Total(1.0));
}

#[test]
fn test_vector_weights_compare_lexicographically() {
    let short = PathWeightValue::Steps(vec![2.0]);
    let long = PathWeightValue::Steps(vec![2.0, 1.0]);
    let bigger = PathWeightValue::Steps(vec![3.0]);
    assert_eq!(short.compare(&long), Ordering::Less);
    assert_eq!(bigger.compare(&long), Ordering::Greater);
    assert_eq!(long.scalar(), 3.0);
}

#[test]
fn test_cycles_stop_paths_unless_allowed() {
    let graph = fixtures::chain_graph(&[("a", "b"), ("b", "a")]);
    let strict = collect_paths(&graph, &PathParams::default()).unwrap();
    let listed: Vec<Vec<String>> = strict.iter().map(|p| node_ids(&graph, p)).collect();
    assert_eq!(listed, vec![vec!["a", "b"], vec!["b", "a"]]);

    let params = PathParams {
        allow_cycles: true,
        ..PathParams::default()
    };
    let cyclic = collect_paths(&graph, &params).unwrap();
    let listed: Vec<Vec<String>> = cyclic.iter().map(|p| node_ids(&graph, p)).collect();
    assert_eq!(
        listed,
        vec![vec!["a", "b", "a", "b"], vec!["b", "a", "b", "a"]]
    );
}

#[test]
fn test_ascending_order_min_length_and_limit() {
    let graph = chain();
    let params = PathParams {
        order: SortOrder::Asc,
        ..PathParams::default()
    };
    let paths = collect_paths(&graph, &params).unwrap();
    let lengths: Vec<usize> = paths.iter().map(Path::len).collect();
    assert_eq!(lengths, vec![1, 2, 3]);

    let params = PathParams {
        min_path_length: 2,
        max_paths: 1,
        ..PathParams::default()
    };
    let paths = collect_paths(&graph, &params).unwrap();
    assert_eq!(paths.len(), 1);
    assert_eq!(node_ids(&graph, &paths[0]), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_max_length_truncates_paths() {
    let graph = chain();
    let params = PathParams {
        max_path_length: 1,
        ..PathParams::default()
    };
    let paths = collect_paths(&graph, &params).unwrap();
    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|p| p.len() == 1));
}

#[test]
fn test_inverted_length_range_is_rejected() {
    let graph = chain();
    let params = PathParams {
        min_path_length: 3,
        max_path_length: 2,
        ..PathParams::default()
    };
    assert!(matches!(
        collect_paths(&graph, &params),
        Err(BopError::InvalidParameter(_))
    ));
}

#[test]
fn test_custom_step_weigher() {
    let graph = chain();
    let params = PathParams {
        step_weight: StepWeight::Constant,
        path_weight: PathWeight::Sum,
        ..PathParams::default()
    };
    let paths = collect_paths(&graph, &params).unwrap();
    assert_eq!(paths[0].step_weights, vec![1.0, 1.0, 1.0]);

    let paths = collect_paths_with(&graph, &params, |graph, edges| {
        let target = graph.get_edge(edges[0]).unwrap().target;
        target.index() as f64
    })
    .unwrap();
    assert_eq!(node_ids(&graph, &paths[0]), vec!["a", "b", "c", "d"]);
    assert_eq!(paths[0].weight, PathWeightValue::Total(2.0 + 3.0 + 4.0));
}
