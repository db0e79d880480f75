//! WebView seam.
//!
//! The bridge only needs one capability from the embedding surface: injecting
//! script text. Injection never blocks and never reports what the script did;
//! an exception thrown inside the embedded content is invisible to native
//! code. Inbound messages flow the other way through
//! [`BridgeHandle::handle_message`](crate::BridgeHandle::handle_message).

use tokio::sync::mpsc;
use tracing::debug;

/// An embedded web surface that can evaluate injected scripts
pub trait WebView: Send + Sync + 'static {
    /// Queue `script` for evaluation in the embedded content
    fn inject_javascript(&self, script: &str);
}

/// WebView that forwards scripts over a channel
///
/// Useful when the real surface must be driven from a UI thread: the
/// receiving end evaluates scripts in the order they were injected.
#[derive(Debug, Clone)]
pub struct ScriptChannel {
    tx: mpsc::UnboundedSender<String>,
}

impl ScriptChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl WebView for ScriptChannel {
    fn inject_javascript(&self, script: &str) {
        if self.tx.send(script.to_string()).is_err() {
            debug!("Script receiver dropped; injection discarded");
        }
    }
}
