//! Error types for the bridge.

use std::time::Duration;

/// Errors surfaced to callers of the bridge handle.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Embedded content has not finished loading")]
    NotReady,

    #[error("Invalid method name: {0:?}")]
    InvalidMethod(String),

    #[error("Pending call for {method} was dropped before a result arrived")]
    ChannelClosed { method: String },

    #[error("No result for {method} after {after:?}")]
    Timeout { method: String, after: Duration },

    #[error("Unexpected result shape for {method}: {source}")]
    UnexpectedResult {
        method: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors produced while decoding an inbound boundary message.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unrecognized message shape")]
    Unrecognized,
}
