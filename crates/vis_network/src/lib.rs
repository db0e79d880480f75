//! vis-network host component
//!
//! Wires a [`vis_bridge::BridgeHandle`] and both reload effectors into a
//! single component a webview host can drive, plus configuration loading and
//! a config file watcher for the `vis-network` binary.

pub mod component;
pub mod config;
pub mod inspect;
pub mod watcher;

pub use component::VisNetwork;
pub use config::{ConfigError, Graph, HostConfig};
pub use inspect::describe_message;
pub use watcher::ConfigWatcher;

pub use vis_bridge;
pub use vis_types;
