//! Graph Data
//!
//! Nodes and edges as handed to `vis.DataSet`. Identifiers are either
//! integers or strings. Edge endpoints are not checked against the node set;
//! dangling references are passed through to the embedded library as-is.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Node or edge identifier (`number | string` on the JS side)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdType {
    Int(i64),
    Str(String),
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdType::Int(id) => write!(f, "{}", id),
            IdType::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for IdType {
    fn from(id: i64) -> Self {
        IdType::Int(id)
    }
}

impl From<i32> for IdType {
    fn from(id: i32) -> Self {
        IdType::Int(id.into())
    }
}

impl From<u32> for IdType {
    fn from(id: u32) -> Self {
        IdType::Int(id.into())
    }
}

impl From<&str> for IdType {
    fn from(id: &str) -> Self {
        IdType::Str(id.to_string())
    }
}

impl From<String> for IdType {
    fn from(id: String) -> Self {
        IdType::Str(id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Nodes and edges
// ─────────────────────────────────────────────────────────────────────────────

/// A node in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique within the node collection
    pub id: IdType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Any other per-node display attributes (color, shape, group, ...)
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Node {
    /// Create a node with no label and no attributes
    pub fn new(id: impl Into<IdType>) -> Self {
        Self {
            id: id.into(),
            label: None,
            attributes: Map::new(),
        }
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set an arbitrary display attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// An edge between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<IdType>,
    pub from: IdType,
    pub to: IdType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Edge {
    /// Create an edge without an explicit id (vis-network assigns one)
    pub fn new(from: impl Into<IdType>, to: impl Into<IdType>) -> Self {
        Self {
            id: None,
            from: from.into(),
            to: to.into(),
            label: None,
            attributes: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<IdType>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Complete graph data: nodes and edges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Data {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
