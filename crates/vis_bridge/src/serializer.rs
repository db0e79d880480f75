//! Options Serializer
//!
//! Turns an [`Options`] tree into a JavaScript expression that rebuilds the
//! same tree inside the embedded content. Plain data goes through
//! `JSON.parse` so keys such as `__proto__` stay own properties instead of
//! being read as prototype setters by an object literal. `chosen` slots
//! holding assignments become inline functions:
//!
//! ```text
//! chosen: { label: (values) => { Object.defineProperty(values, "size", { value: 36, .. }); } }
//! ```
//!
//! Boolean slots stay literal booleans and absent slots are omitted entirely
//! so the embedded library falls back to its defaults.
//!
//! Output is deterministic: `serde_json::Map` iterates in key order.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use vis_types::{ChosenSlot, EdgeChosen, EdgeOptions, NodeChosen, NodeOptions, Options};

/// Serialize any value as a JS expression via JSON
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> String {
    match serde_json::to_string(value) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize value for injection: {}", e);
            "null".to_string()
        }
    }
}

/// Expression rebuilding a JSON value; containers are parsed at runtime
fn json_expression(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => format!("JSON.parse({})", to_js(&to_js(value))),
        _ => to_js(value),
    }
}

/// Expression for an optional options tree; `None` becomes `{}`
pub fn options_expression(options: Option<&Options>) -> String {
    match options {
        Some(options) => serialize_options(options),
        None => "{}".to_string(),
    }
}

/// Expression rebuilding the whole options tree
pub fn serialize_options(options: &Options) -> String {
    let mut members = Vec::new();
    push_spread(&mut members, &options.rest);
    if let Some(edges) = &options.edges {
        members.push(format!("edges: {}", serialize_edge_options(edges)));
    }
    if let Some(nodes) = &options.nodes {
        members.push(format!("nodes: {}", serialize_node_options(nodes)));
    }
    object(members)
}

fn serialize_node_options(options: &NodeOptions) -> String {
    let mut members = Vec::new();
    push_spread(&mut members, &options.rest);
    match &options.chosen {
        None => {}
        Some(NodeChosen::Toggle(enabled)) => members.push(format!("chosen: {}", enabled)),
        Some(NodeChosen::Slots(slots)) => {
            let mut chosen = Vec::new();
            push_spread(&mut chosen, &slots.rest);
            push_slot(&mut chosen, "node", slots.node.as_ref());
            push_slot(&mut chosen, "label", slots.label.as_ref());
            members.push(format!("chosen: {}", object(chosen)));
        }
    }
    object(members)
}

fn serialize_edge_options(options: &EdgeOptions) -> String {
    let mut members = Vec::new();
    push_spread(&mut members, &options.rest);
    match &options.chosen {
        None => {}
        Some(EdgeChosen::Toggle(enabled)) => members.push(format!("chosen: {}", enabled)),
        Some(EdgeChosen::Slots(slots)) => {
            let mut chosen = Vec::new();
            push_spread(&mut chosen, &slots.rest);
            push_slot(&mut chosen, "edge", slots.edge.as_ref());
            push_slot(&mut chosen, "label", slots.label.as_ref());
            members.push(format!("chosen: {}", object(chosen)));
        }
    }
    object(members)
}

/// Emit a single chosen slot; nothing at all when absent
fn push_slot(members: &mut Vec<String>, key: &str, slot: Option<&ChosenSlot>) {
    match slot {
        None => {}
        Some(ChosenSlot::Toggle(enabled)) => members.push(format!("{}: {}", key, enabled)),
        Some(ChosenSlot::Assign(values)) => {
            members.push(format!("{}: {}", key, assignment_function(values)))
        }
    }
}

/// `(values) => { Object.defineProperty(values, "k", ..); ... }`
///
/// Plain assignment would invoke the `__proto__` setter for that key.
fn assignment_function(values: &Map<String, Value>) -> String {
    if values.is_empty() {
        return "(values) => {}".to_string();
    }
    let body = values
        .iter()
        .map(|(key, value)| {
            format!(
                "Object.defineProperty(values, {}, {{ value: {}, writable: true, enumerable: true, configurable: true }});",
                to_js(key),
                json_expression(value)
            )
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("(values) => {{ {} }}", body)
}

fn push_spread(members: &mut Vec<String>, rest: &Map<String, Value>) {
    if !rest.is_empty() {
        members.push(format!("...JSON.parse({})", to_js(&to_js(rest))));
    }
}

fn object(members: Vec<String>) -> String {
    if members.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", members.join(", "))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
