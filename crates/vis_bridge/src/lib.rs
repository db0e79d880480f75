//! vis-network Bridge
//!
//! Drives a vis-network instance living inside a webview from native code.
//! Calls travel into the page as injected scripts; results and events come
//! back as JSON envelopes posted by the page and correlated by callback id.
//!
//! # Architecture
//!
//! - [`BridgeHandle`] is the imperative surface, gated on the page load
//! - [`CallbackCache`] maps correlation ids to pending callbacks
//! - [`codec`] classifies inbound envelopes
//! - [`serializer`] rebuilds options trees, `chosen` callbacks included
//! - [`DataReloader`] and [`OptionsReloader`] push host-side changes
//! - [`page`] renders the document the webview loads

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod handle;
pub mod page;
pub mod reload;
pub mod script;
pub mod serializer;
pub mod state;
pub mod webview;

pub use cache::{CallbackCache, CallbackId, Cardinality};
pub use codec::{BoundaryMessage, decode};
pub use config::{BridgeConfig, VIS_NETWORK_VERSION};
pub use error::{BridgeError, CodecError};
pub use handle::{BridgeHandle, Dispatch, EventSubscription, PendingResult};
pub use page::{PageConfig, render_page};
pub use reload::{DataReloader, OptionsReloader, ReloadOutcome};
pub use script::ScriptBuilder;
pub use state::BridgeState;
pub use webview::{ScriptChannel, WebView};

pub use vis_types;
