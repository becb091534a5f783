#![allow(dead_code)]

use bopgraph::graph::{AttributedGraph, ElementSpec, GraphBuilder, NodeId};

/// Graph with the given `(id, type)` nodes and `(source, target, tag)` edges.
pub fn build(nodes: &[(&str, &str)], edges: &[(&str, &str, &str)]) -> AttributedGraph {
    let mut builder = GraphBuilder::new();
    for (id, type_label) in nodes {
        builder.node(id, type_label).expect("node");
    }
    for (source, target, tag) in edges {
        let source = builder.lookup(source).expect("source");
        let target = builder.lookup(target).expect("target");
        builder.edge(source, target, tag).expect("edge");
    }
    builder.build()
}

/// `root` (no edges) followed by `a`, `b`, `c`, `d`, all typed `node`.
pub fn chain_graph(edges: &[(&str, &str)]) -> AttributedGraph {
    let tagged: Vec<(&str, &str, &str)> = edges.iter().map(|(s, t)| (*s, *t, "edge")).collect();
    build(
        &[
            ("root", "node"),
            ("a", "node"),
            ("b", "node"),
            ("c", "node"),
            ("d", "node"),
        ],
        &tagged,
    )
}

/// Template fixture: `root`, `a`, `aa`, `b` plus one tagged edge `a -> b`.
pub fn template_graph() -> AttributedGraph {
    let mut builder = GraphBuilder::new();
    builder
        .add_node(
            ElementSpec::new("root")
                .with_id("root")
                .with_name("root")
                .with_type("node"),
        )
        .expect("root");
    let mut handles = Vec::new();
    for id in ["a", "aa", "b"] {
        handles.push(
            builder
                .add_node(
                    ElementSpec::new("node")
                        .with_id(id)
                        .with_name(id.to_uppercase())
                        .with_type("node")
                        .with_attr("id", id)
                        .with_attr("type", "node"),
                )
                .expect("node"),
        );
    }
    builder
        .add_edge(
            ElementSpec::new("edge")
                .with_attr("id", "a-b")
                .with_attr("weight", "12"),
            handles[0],
            handles[2],
        )
        .expect("edge");
    builder.build()
}

pub fn node(graph: &AttributedGraph, id: &str) -> NodeId {
    graph.find_node(id).expect("fixture node")
}
