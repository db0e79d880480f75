//! Network Options
//!
//! The options tree is mostly plain data and is kept as raw JSON. The only
//! typed parts are the `chosen` sub-trees of `nodes` and `edges`: vis-network
//! expects either a boolean or a per-element callback there, which plain JSON
//! cannot express. [`ChosenSlot::Assign`] models that callback as the list of
//! assignments it performs on its `values` argument.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Chosen slots
// ─────────────────────────────────────────────────────────────────────────────

/// A single `chosen.node` / `chosen.edge` / `chosen.label` slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChosenSlot {
    /// Toggle the default highlighting for the element
    Toggle(bool),
    /// Callback assigning each key/value onto the element's `values`
    Assign(Map<String, Value>),
}

impl ChosenSlot {
    /// Build an assignment slot from key/value pairs
    pub fn assign<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        ChosenSlot::Assign(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<bool> for ChosenSlot {
    fn from(value: bool) -> Self {
        ChosenSlot::Toggle(value)
    }
}

/// `nodes.chosen` sub-tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeChosenSlots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<ChosenSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<ChosenSlot>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// `edges.chosen` sub-tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeChosenSlots {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<ChosenSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<ChosenSlot>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// Value of `nodes.chosen`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeChosen {
    Toggle(bool),
    Slots(NodeChosenSlots),
}

/// Value of `edges.chosen`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeChosen {
    Toggle(bool),
    Slots(EdgeChosenSlots),
}

// ─────────────────────────────────────────────────────────────────────────────
// Node / edge option groups
// ─────────────────────────────────────────────────────────────────────────────

/// `options.nodes`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen: Option<NodeChosen>,
    /// Every other node option (color, shape, font, ...)
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

/// `options.edges`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen: Option<EdgeChosen>,
    /// Every other edge option (arrows, smooth, width, ...)
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// The full options tree passed to `new vis.Network(..)` / `setOptions(..)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Options {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<NodeOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<EdgeOptions>,
    /// Top-level groups other than `nodes`/`edges` (physics, layout, interaction, ...)
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Options {
    /// Set a top-level plain-data group
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.rest.insert(key.into(), value);
        self
    }

    pub fn with_nodes(mut self, nodes: NodeOptions) -> Self {
        self.nodes = Some(nodes);
        self
    }

    pub fn with_edges(mut self, edges: EdgeOptions) -> Self {
        self.edges = Some(edges);
        self
    }

    /// True when any `chosen` slot holds an assignment callback
    pub fn has_callbacks(&self) -> bool {
        let slot_is_callback =
            |slot: &Option<ChosenSlot>| matches!(slot, Some(ChosenSlot::Assign(_)));

        let nodes = match self.nodes.as_ref().and_then(|n| n.chosen.as_ref()) {
            Some(NodeChosen::Slots(slots)) => {
                slot_is_callback(&slots.node) || slot_is_callback(&slots.label)
            }
            _ => false,
        };
        let edges = match self.edges.as_ref().and_then(|e| e.chosen.as_ref()) {
            Some(EdgeChosen::Slots(slots)) => {
                slot_is_callback(&slots.edge) || slot_is_callback(&slots.label)
            }
            _ => false,
        };
        nodes || edges
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
