mod builder;
mod types;

use indexmap::IndexSet;

pub use builder::{EdgeDocument, ElementSpec, GraphBuilder, GraphDocument, NodeDocument};
pub use types::{
    AttributeValue, Attributes, EdgeId, EdgeRecord, ElementRef, GraphElement, NodeId, NodeRecord,
};

use crate::errors::BopError;

/// Read-only typed attributed graph stored as flat record tables.
///
/// Node order in the table is discovery order. Handles are only meaningful
/// for the graph that issued them; `get_*` and `check_*` validate them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributedGraph {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl AttributedGraph {
    pub(crate) fn from_parts(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        Self { nodes, edges }
    }

    /// Builds a graph from its serde form, checking ids and references.
    pub fn from_document(doc: &GraphDocument) -> Result<Self, BopError> {
        GraphBuilder::from_document(doc).map(GraphBuilder::build)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node handles in discovery order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(|idx| NodeId(idx as u32))
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edges.len()).map(|idx| EdgeId(idx as u32))
    }

    /// Unchecked access for handles already validated against this graph.
    pub(crate) fn node(&self, id: NodeId) -> &NodeRecord {
        &self.nodes[id.index()]
    }

    pub(crate) fn edge(&self, id: EdgeId) -> &EdgeRecord {
        &self.edges[id.index()]
    }

    pub fn get_node(&self, id: NodeId) -> Result<&NodeRecord, BopError> {
        self.nodes
            .get(id.index())
            .ok_or_else(|| BopError::not_found(format!("node {id}")))
    }

    pub fn get_edge(&self, id: EdgeId) -> Result<&EdgeRecord, BopError> {
        self.edges
            .get(id.index())
            .ok_or_else(|| BopError::not_found(format!("edge {id}")))
    }

    pub fn check_node(&self, id: NodeId) -> Result<(), BopError> {
        self.get_node(id).map(|_| ())
    }

    pub fn check_element(&self, element: ElementRef) -> Result<(), BopError> {
        match element {
            ElementRef::Node(id) => self.check_node(id),
            ElementRef::Edge(id) => self.get_edge(id).map(|_| ()),
        }
    }

    /// Looks a node up by its model identifier.
    pub fn find_node(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.id.as_deref() == Some(id))
            .map(|idx| NodeId(idx as u32))
    }

    pub(crate) fn element(&self, element: ElementRef) -> &dyn GraphElement {
        match element {
            ElementRef::Node(id) => self.node(id),
            ElementRef::Edge(id) => self.edge(id),
        }
    }

    pub(crate) fn outgoing(&self, id: NodeId) -> &[EdgeId] {
        &self.node(id).outgoing
    }

    pub fn get_element(&self, element: ElementRef) -> Result<&dyn GraphElement, BopError> {
        self.check_element(element)?;
        Ok(self.element(element))
    }

    /// Nodes one edge away in either direction, self excluded, in edge order.
    pub fn neighbours(&self, id: NodeId) -> Result<IndexSet<NodeId>, BopError> {
        self.check_node(id)?;
        Ok(self.adjacent(id))
    }

    pub(crate) fn adjacent(&self, id: NodeId) -> IndexSet<NodeId> {
        let record = self.node(id);
        let mut out = IndexSet::new();
        for edge in &record.outgoing {
            let target = self.edge(*edge).target;
            if target != id {
                out.insert(target);
            }
        }
        for edge in &record.incoming {
            let source = self.edge(*edge).source;
            if source != id {
                out.insert(source);
            }
        }
        out
    }

    /// Number of edges between `a` and `b` in either direction.
    pub fn edges_between(&self, a: NodeId, b: NodeId) -> Result<usize, BopError> {
        self.check_node(a)?;
        self.check_node(b)?;
        Ok(self.edge_multiplicity(a, b))
    }

    pub(crate) fn edge_multiplicity(&self, a: NodeId, b: NodeId) -> usize {
        let forward = self
            .outgoing(a)
            .iter()
            .filter(|edge| self.edge(**edge).target == b)
            .count();
        if a == b {
            return forward;
        }
        let backward = self
            .outgoing(b)
            .iter()
            .filter(|edge| self.edge(**edge).target == a)
            .count();
        forward + backward
    }

    /// Label used when grouping nodes: the node type, or `"unknown"`.
    pub fn node_label(&self, id: NodeId) -> Result<&str, BopError> {
        Ok(label_of(self.get_node(id)?))
    }

    pub(crate) fn label(&self, id: NodeId) -> &str {
        label_of(self.node(id))
    }
}

fn label_of(record: &NodeRecord) -> &str {
    record.type_label.as_deref().unwrap_or("unknown")
}
