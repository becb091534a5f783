use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Handle of a node inside one [`AttributedGraph`](crate::graph::AttributedGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

/// Handle of an edge inside one [`AttributedGraph`](crate::graph::AttributedGraph).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in discovery order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Attribute value as read from the source model.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Single(String),
    Many(Vec<String>),
}

impl AttributeValue {
    /// Flattened string form; list values are concatenated without separator.
    pub fn literal(&self) -> String {
        match self {
            AttributeValue::Single(value) => value.clone(),
            AttributeValue::Many(values) => values.concat(),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Single(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Single(value)
    }
}

pub type Attributes = IndexMap<String, AttributeValue>;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub type_label: Option<String>,
    pub tag: String,
    pub attributes: Attributes,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub incoming: Vec<EdgeId>,
    pub outgoing: Vec<EdgeId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub type_label: Option<String>,
    pub tag: String,
    pub attributes: Attributes,
    pub source: NodeId,
    pub target: NodeId,
}

/// Either kind of graph element, as seen by templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Node(NodeId),
    Edge(EdgeId),
}

/// Uniform read access to the fields templates can select.
pub trait GraphElement {
    fn element_id(&self) -> Option<&str>;
    fn element_name(&self) -> Option<&str>;
    fn element_type(&self) -> Option<&str>;
    fn element_tag(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<&AttributeValue>;
}

impl GraphElement for NodeRecord {
    fn element_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn element_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn element_type(&self) -> Option<&str> {
        self.type_label.as_deref()
    }

    fn element_tag(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

impl GraphElement for EdgeRecord {
    fn element_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn element_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn element_type(&self) -> Option<&str> {
        self.type_label.as_deref()
    }

    fn element_tag(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}
