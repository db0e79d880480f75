//! Vis Types - Core type definitions for the vis-network bridge
//!
//! This crate contains the pure data structures exchanged with the embedded
//! vis-network instance: graph data, the options tree, view-manipulation
//! arguments, query results and event names.
//!
//! Everything here serializes to the exact JSON shape vis-network expects,
//! so values can be embedded directly into injected scripts.

mod data;
mod events;
mod options;
mod view;

pub use data::*;
pub use events::*;
pub use options::*;
pub use view::*;
