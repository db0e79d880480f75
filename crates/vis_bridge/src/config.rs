//! Bridge configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default vis-network release loaded by the host page
pub const VIS_NETWORK_VERSION: &str = "9.1.6";

/// Settings shared by the bridge handle, the reload effectors and the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Function the embedded content calls to post a message to native code
    pub post_message: String,

    /// vis-network version pulled from the CDN
    pub vis_network_version: String,

    /// Full script URL; overrides the CDN URL built from the version
    pub vis_network_url: Option<String>,

    /// Re-fit the view once layout stabilizes after a data reload
    pub zoom_fit_on_stabilized: bool,

    /// `maxZoomLevel` passed to the post-stabilization fit
    pub fit_max_zoom_level: f64,

    /// Give up on result-bearing calls after this many milliseconds
    pub call_timeout_ms: Option<u64>,

    /// Re-apply data/options changes missed before the page finished loading
    pub replay_on_ready: bool,

    /// Key the page registers the network under; random when unset
    pub instance_key: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            post_message: "window.ipc.postMessage".to_string(),
            vis_network_version: VIS_NETWORK_VERSION.to_string(),
            vis_network_url: None,
            zoom_fit_on_stabilized: true,
            fit_max_zoom_level: 100.0,
            call_timeout_ms: None,
            replay_on_ready: false,
            instance_key: None,
        }
    }
}

impl BridgeConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }

    /// Script URL for the configured vis-network release
    pub fn script_url(&self) -> String {
        self.vis_network_url.clone().unwrap_or_else(|| {
            format!(
                "https://unpkg.com/vis-network@{}/standalone/umd/vis-network.min.js",
                self.vis_network_version
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert!(config.zoom_fit_on_stabilized);
        assert_eq!(config.call_timeout(), None);
        assert_eq!(
            config.script_url(),
            "https://unpkg.com/vis-network@9.1.6/standalone/umd/vis-network.min.js"
        );
    }

    #[test]
    fn test_partial_deserialize() {
        let config: BridgeConfig =
            serde_json::from_str(r#"{"call_timeout_ms": 250, "replay_on_ready": true}"#).unwrap();
        assert_eq!(config.call_timeout(), Some(Duration::from_millis(250)));
        assert!(config.replay_on_ready);
        assert_eq!(config.post_message, "window.ipc.postMessage");
    }
}
