use bopgraph::BopError;
use bopgraph::config::NormalizationParams;
use bopgraph::embedding::embed_partitions;
use bopgraph::graph::AttributedGraph;
use bopgraph::normalize::{MASKED_LABEL, normalize_partition, normalize_partitions};
use bopgraph::partition::Partition;

#[path = "fixtures.rs"]
mod fixtures;

fn model() -> AttributedGraph {
    fixtures::build(
        &[
            ("p1", "class"),
            ("m1", "method"),
            ("m2", "method"),
            ("c2", "class"),
        ],
        &[
            ("p1", "m1", "owns"),
            ("p1", "m2", "owns"),
            ("m1", "m2", "calls"),
            ("c2", "p1", "extends"),
        ],
    )
}

fn partition(graph: &AttributedGraph, ids: &[&str]) -> Partition {
    ids.iter().map(|id| fixtures::node(graph, id)).collect()
}

#[test]
fn test_labels_group_by_type_in_discovery_order() {
    let graph = model();
    let normalized = normalize_partition(&graph, &partition(&graph, &["c2", "m2", "m1", "p1"]), false)
        .unwrap();
    let labels: Vec<String> = normalized.nodes.iter().map(|n| n.id()).collect();
    assert_eq!(labels, vec!["class_0", "class_1", "method_0", "method_1"]);
    let identifiers: Vec<&str> = normalized.edge_identifiers().collect();
    assert_eq!(
        identifiers,
        vec![
            "class_0>method_0[owns]",
            "class_0>method_1[owns]",
            "class_1>class_0[extends]",
            "method_0>method_1[calls]",
        ]
    );
}

#[test]
fn test_masked_labels_share_one_group() {
    let graph = model();
    let normalized =
        normalize_partition(&graph, &partition(&graph, &["p1", "m1", "m2", "c2"]), true).unwrap();
    assert!(normalized.nodes.iter().all(|n| n.label == MASKED_LABEL));
    assert_eq!(normalized.nodes[3].id(), "<node>_3");
    assert_eq!(normalized.edges[0].identifier, "<node>_0><node>_1[owns]");
}

#[test]
fn test_edges_leaving_partition_are_dropped() {
    let graph = model();
    let normalized =
        normalize_partition(&graph, &partition(&graph, &["p1", "m1"]), false).unwrap();
    assert_eq!(normalized.edges.len(), 1);
    assert_eq!(normalized.edges[0].source, 0);
    assert_eq!(normalized.edges[0].target, 1);
}

#[test]
fn test_mapping_merges_partitions() {
    let graph = model();
    let parts = vec![
        partition(&graph, &["p1", "m1"]),
        partition(&graph, &["c2", "m2"]),
    ];
    let (normalized, mapping) =
        normalize_partitions(&graph, &parts, &NormalizationParams::default()).unwrap();
    assert_eq!(normalized.len(), 2);
    let keys: Vec<&String> = mapping.keys().collect();
    assert_eq!(keys, vec!["class_0", "method_0"]);
    assert_eq!(mapping["class_0"], vec!["p1", "c2"]);
    assert_eq!(mapping["method_0"], vec!["m1", "m2"]);
}

#[test]
fn test_embedding_header_and_rows() {
    let graph = model();
    let parts = vec![
        partition(&graph, &["p1", "m1", "m2"]),
        partition(&graph, &["m1", "m2"]),
    ];
    let (normalized, _) =
        normalize_partitions(&graph, &parts, &NormalizationParams::default()).unwrap();
    let embedding = embed_partitions(&normalized);
    assert_eq!(
        embedding.header,
        vec![
            "class_0>method_0[owns]",
            "class_0>method_1[owns]",
            "method_0>method_1[calls]",
        ]
    );
    assert_eq!(embedding.rows, vec![vec![1, 1, 1], vec![0, 0, 1]]);
    assert_eq!(embedding.transactions(), vec![vec![0, 1, 2], vec![2]]);
    assert_eq!(
        embedding.decode_row(1).unwrap(),
        vec!["method_0>method_1[calls]"]
    );
    assert!(matches!(embedding.decode_row(5), Err(BopError::NotFound(_))));
    assert!(matches!(
        embedding.decode_items(&[7]),
        Err(BopError::Invariant(_))
    ));
}

#[test]
fn test_parallel_edges_set_a_single_cell() {
    let graph = fixtures::build(
        &[("x", "class"), ("y", "class")],
        &[("x", "y", "uses"), ("x", "y", "uses")],
    );
    let (normalized, _) = normalize_partitions(
        &graph,
        &[partition(&graph, &["x", "y"])],
        &NormalizationParams::default(),
    )
    .unwrap();
    assert_eq!(normalized[0].edges.len(), 2);
    let embedding = embed_partitions(&normalized);
    assert_eq!(embedding.header, vec!["class_0>class_1[uses]"]);
    assert_eq!(embedding.rows, vec![vec![1]]);
}

#[test]
fn test_empty_partition_list_embeds_to_nothing() {
    let embedding = embed_partitions(&[]);
    assert!(embedding.header.is_empty());
    assert!(embedding.rows.is_empty());
}
