//! View Types
//!
//! Arguments for view-manipulation calls (fit, focus, moveTo, ...) and the
//! shapes returned by result-bearing queries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::IdType;

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// A point in canvas or DOM coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Node bounding box in canvas coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Result of `getPositions`, keyed by node id as a string
pub type Positions = BTreeMap<String, Position>;

// ─────────────────────────────────────────────────────────────────────────────
// Animation
// ─────────────────────────────────────────────────────────────────────────────

/// Easing curve for view animations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EasingFunction {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    #[default]
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
}

/// Explicit animation settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationOptions {
    /// Duration in milliseconds
    pub duration: f64,
    pub easing_function: EasingFunction,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration: 500.0,
            easing_function: EasingFunction::EaseInOutQuad,
        }
    }
}

/// `animation` field: either a switch or explicit settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimelineAnimation {
    Enabled(bool),
    Options(AnimationOptions),
}

// ─────────────────────────────────────────────────────────────────────────────
// View-manipulation arguments
// ─────────────────────────────────────────────────────────────────────────────

/// Arguments for `fit`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<IdType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_zoom_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<TimelineAnimation>,
}

/// Arguments for `focus`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<TimelineAnimation>,
}

/// Arguments for `moveTo`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveToOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<TimelineAnimation>,
}

/// Options for `setSelection`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unselect_all: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_edges: Option<bool>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Query results
// ─────────────────────────────────────────────────────────────────────────────

/// Current selection (`getSelection`), also the argument to `setSelection`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub nodes: Vec<IdType>,
    #[serde(default)]
    pub edges: Vec<IdType>,
}

/// Direction filter for `getConnectedNodes` on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionType {
    From,
    To,
}

/// Endpoints of an edge, returned by `getConnectedNodes` for an edge id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEndpoints {
    pub from_id: IdType,
    pub to_id: IdType,
}

/// Result of `getConnectedNodes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConnectedNodes {
    Ids(Vec<IdType>),
    Endpoints(Vec<EdgeEndpoints>),
}
