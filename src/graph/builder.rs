use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::AttributedGraph;
use super::types::{AttributeValue, Attributes, EdgeId, EdgeRecord, NodeId, NodeRecord};
use crate::errors::BopError;

/// Serialized form of one node. `parent` refers to another node's `id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_label: Option<String>,
    #[serde(default)]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

/// Serialized form of one edge; endpoints are node ids.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_label: Option<String>,
    #[serde(default)]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

/// Fields shared by node and edge records when building programmatically.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSpec {
    pub id: Option<String>,
    pub name: Option<String>,
    pub type_label: Option<String>,
    pub tag: String,
    pub attributes: Attributes,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_type(mut self, type_label: impl Into<String>) -> Self {
        self.type_label = Some(type_label.into());
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

pub fn validate_spec(spec: &ElementSpec, what: &str) -> Result<(), BopError> {
    if spec.id.as_deref().is_some_and(|id| id.trim().is_empty()) {
        return Err(BopError::invalid_input(format!("{what} id must not be empty")));
    }
    if spec.attributes.keys().any(|key| key.trim().is_empty()) {
        return Err(BopError::invalid_input(format!(
            "{what} attribute names must not be empty"
        )));
    }
    Ok(())
}

/// Incremental, validating constructor for [`AttributedGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    ids: AHashMap<String, NodeId>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, spec: ElementSpec) -> Result<NodeId, BopError> {
        validate_spec(&spec, "node")?;
        let handle = u32::try_from(self.nodes.len())
            .map(NodeId)
            .map_err(|_| BopError::invalid_input("too many nodes"))?;
        if let Some(id) = &spec.id {
            if self.ids.contains_key(id) {
                return Err(BopError::invalid_input(format!("duplicate node id {id}")));
            }
            self.ids.insert(id.clone(), handle);
        }
        self.nodes.push(NodeRecord {
            id: spec.id,
            name: spec.name,
            type_label: spec.type_label,
            tag: spec.tag,
            attributes: spec.attributes,
            parent: None,
            children: Vec::new(),
            incoming: Vec::new(),
            outgoing: Vec::new(),
        });
        Ok(handle)
    }

    /// Shorthand for a node whose tag equals its type.
    pub fn node(&mut self, id: &str, type_label: &str) -> Result<NodeId, BopError> {
        self.add_node(
            ElementSpec::new(type_label)
                .with_id(id)
                .with_name(id)
                .with_type(type_label),
        )
    }

    pub fn add_edge(
        &mut self,
        spec: ElementSpec,
        source: NodeId,
        target: NodeId,
    ) -> Result<EdgeId, BopError> {
        validate_spec(&spec, "edge")?;
        self.check(source)?;
        self.check(target)?;
        let handle = u32::try_from(self.edges.len())
            .map(EdgeId)
            .map_err(|_| BopError::invalid_input("too many edges"))?;
        self.edges.push(EdgeRecord {
            id: spec.id,
            name: spec.name,
            type_label: spec.type_label,
            tag: spec.tag,
            attributes: spec.attributes,
            source,
            target,
        });
        self.nodes[source.index()].outgoing.push(handle);
        self.nodes[target.index()].incoming.push(handle);
        Ok(handle)
    }

    /// Shorthand for an edge with only a tag.
    pub fn edge(&mut self, source: NodeId, target: NodeId, tag: &str) -> Result<EdgeId, BopError> {
        self.add_edge(ElementSpec::new(tag), source, target)
    }

    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<(), BopError> {
        self.check(child)?;
        self.check(parent)?;
        if child == parent {
            return Err(BopError::invalid_input(format!(
                "node {child} cannot be its own parent"
            )));
        }
        if let Some(previous) = self.nodes[child.index()].parent {
            self.nodes[previous.index()].children.retain(|id| *id != child);
        }
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    pub fn from_document(doc: &GraphDocument) -> Result<Self, BopError> {
        let mut builder = Self::new();
        for node in &doc.nodes {
            builder.add_node(ElementSpec {
                id: node.id.clone(),
                name: node.name.clone(),
                type_label: node.type_label.clone(),
                tag: node.tag.clone(),
                attributes: node.attributes.clone(),
            })?;
        }
        for (idx, node) in doc.nodes.iter().enumerate() {
            if let Some(parent) = &node.parent {
                let parent = builder.resolve(parent)?;
                builder.set_parent(NodeId(idx as u32), parent)?;
            }
        }
        for edge in &doc.edges {
            let source = builder.resolve(&edge.source)?;
            let target = builder.resolve(&edge.target)?;
            builder.add_edge(
                ElementSpec {
                    id: edge.id.clone(),
                    name: edge.name.clone(),
                    type_label: edge.type_label.clone(),
                    tag: edge.tag.clone(),
                    attributes: edge.attributes.clone(),
                },
                source,
                target,
            )?;
        }
        Ok(builder)
    }

    pub fn build(self) -> AttributedGraph {
        AttributedGraph::from_parts(self.nodes, self.edges)
    }

    fn resolve(&self, id: &str) -> Result<NodeId, BopError> {
        self.lookup(id)
            .ok_or_else(|| BopError::invalid_input(format!("unknown node id {id}")))
    }

    fn check(&self, id: NodeId) -> Result<(), BopError> {
        if id.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(BopError::not_found(format!("node {id}")))
        }
    }
}
