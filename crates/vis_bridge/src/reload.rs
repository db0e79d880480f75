//! Reload Effectors
//!
//! Two independent rules that push host-side changes into the embedded
//! content. Each effector remembers the last reference it saw and reacts only
//! when the host hands it a different `Arc` (pointer identity, not equality).
//!
//! Both are no-ops while the bridge is unready. A change seen before the
//! Ready transition is remembered as missed and only re-applied through
//! `replay` when the host opts into it.

use std::sync::Arc;

use tracing::debug;

use vis_types::{Data, Options};

use crate::handle::BridgeHandle;

/// What an effector did with an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Injected into the embedded content
    Applied,
    /// Same reference as last time; nothing to do
    Unchanged,
    /// Bridge not ready; the update was not injected
    Missed,
}

fn same_ref<T>(a: Option<&Arc<T>>, b: Option<&Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Data
// ─────────────────────────────────────────────────────────────────────────────

/// Replaces the whole data set whenever the data reference or the
/// zoom-fit flag changes
#[derive(Debug)]
pub struct DataReloader {
    data: Arc<Data>,
    zoom_fit_on_stabilized: bool,
    missed: bool,
}

impl DataReloader {
    /// Start tracking `data`, which the host page already rendered
    pub fn new(data: Arc<Data>, zoom_fit_on_stabilized: bool) -> Self {
        Self {
            data,
            zoom_fit_on_stabilized,
            missed: false,
        }
    }

    pub fn current(&self) -> &Arc<Data> {
        &self.data
    }

    pub fn zoom_fit_on_stabilized(&self) -> bool {
        self.zoom_fit_on_stabilized
    }

    pub fn has_missed(&self) -> bool {
        self.missed
    }

    pub fn update(
        &mut self,
        handle: &BridgeHandle,
        data: Arc<Data>,
        zoom_fit_on_stabilized: bool,
    ) -> ReloadOutcome {
        if Arc::ptr_eq(&self.data, &data) && self.zoom_fit_on_stabilized == zoom_fit_on_stabilized
        {
            return ReloadOutcome::Unchanged;
        }
        self.data = data;
        self.zoom_fit_on_stabilized = zoom_fit_on_stabilized;
        self.apply(handle)
    }

    /// Re-apply the latest update missed while unready
    pub fn replay(&mut self, handle: &BridgeHandle) -> ReloadOutcome {
        if !self.missed {
            return ReloadOutcome::Unchanged;
        }
        debug!("Replaying data update missed before ready");
        self.apply(handle)
    }

    fn apply(&mut self, handle: &BridgeHandle) -> ReloadOutcome {
        if handle.reload_data(&self.data, self.zoom_fit_on_stabilized) {
            self.missed = false;
            ReloadOutcome::Applied
        } else {
            self.missed = true;
            ReloadOutcome::Missed
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Replaces the whole options tree whenever the options reference changes
#[derive(Debug)]
pub struct OptionsReloader {
    options: Option<Arc<Options>>,
    missed: bool,
}

impl OptionsReloader {
    pub fn new(options: Option<Arc<Options>>) -> Self {
        Self {
            options,
            missed: false,
        }
    }

    pub fn current(&self) -> Option<&Arc<Options>> {
        self.options.as_ref()
    }

    pub fn has_missed(&self) -> bool {
        self.missed
    }

    pub fn update(&mut self, handle: &BridgeHandle, options: Option<Arc<Options>>) -> ReloadOutcome {
        if same_ref(self.options.as_ref(), options.as_ref()) {
            return ReloadOutcome::Unchanged;
        }
        self.options = options;
        self.apply(handle)
    }

    pub fn replay(&mut self, handle: &BridgeHandle) -> ReloadOutcome {
        if !self.missed {
            return ReloadOutcome::Unchanged;
        }
        debug!("Replaying options update missed before ready");
        self.apply(handle)
    }

    fn apply(&mut self, handle: &BridgeHandle) -> ReloadOutcome {
        if handle.reload_options(self.options.as_deref()) {
            self.missed = false;
            ReloadOutcome::Applied
        } else {
            self.missed = true;
            ReloadOutcome::Missed
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;
    use vis_types::{Node, NodeOptions};

    use crate::config::BridgeConfig;
    use crate::webview::ScriptChannel;

    fn unready() -> (BridgeHandle, mpsc::UnboundedReceiver<String>) {
        let (webview, rx) = ScriptChannel::new();
        (BridgeHandle::new(webview, BridgeConfig::default()), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
        let mut scripts = Vec::new();
        while let Ok(script) = rx.try_recv() {
            scripts.push(script);
        }
        scripts
    }

    fn data_with(label: &str) -> Arc<Data> {
        Arc::new(Data::new(vec![Node::new(1).with_label(label)], vec![]))
    }

    #[test]
    fn test_same_reference_is_unchanged() {
        let (handle, mut rx) = unready();
        handle.mark_ready();
        let data = data_with("a");
        let mut reloader = DataReloader::new(data.clone(), true);
        assert_eq!(reloader.update(&handle, data, true), ReloadOutcome::Unchanged);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_equal_but_new_reference_reloads() {
        let (handle, mut rx) = unready();
        handle.mark_ready();
        let mut reloader = DataReloader::new(data_with("a"), true);
        assert_eq!(
            reloader.update(&handle, data_with("a"), true),
            ReloadOutcome::Applied
        );
        let scripts = drain(&mut rx);
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("new vis.DataSet"));
        assert!(scripts[0].contains("once('stabilized'"));
    }

    #[test]
    fn test_zoom_flag_change_reloads_without_fit() {
        let (handle, mut rx) = unready();
        handle.mark_ready();
        let data = data_with("a");
        let mut reloader = DataReloader::new(data.clone(), true);
        assert_eq!(reloader.update(&handle, data, false), ReloadOutcome::Applied);
        let scripts = drain(&mut rx);
        assert!(!scripts[0].contains("stabilized"));
    }

    #[test]
    fn test_update_before_ready_is_missed_and_not_replayed() {
        let (handle, mut rx) = unready();
        let mut reloader = DataReloader::new(data_with("a"), true);
        assert_eq!(
            reloader.update(&handle, data_with("b"), true),
            ReloadOutcome::Missed
        );
        assert!(reloader.has_missed());

        handle.mark_ready();
        // Nothing flows in on the transition itself
        assert!(drain(&mut rx).is_empty());

        // Re-supplying the same reference does not recover it either
        let current = reloader.current().clone();
        assert_eq!(
            reloader.update(&handle, current, true),
            ReloadOutcome::Unchanged
        );
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_replay_applies_latest_missed_update() {
        let (handle, mut rx) = unready();
        let mut reloader = DataReloader::new(data_with("a"), true);
        reloader.update(&handle, data_with("b"), true);
        reloader.update(&handle, data_with("c"), true);

        handle.mark_ready();
        assert_eq!(reloader.replay(&handle), ReloadOutcome::Applied);
        assert_eq!(reloader.replay(&handle), ReloadOutcome::Unchanged);

        let scripts = drain(&mut rx);
        assert_eq!(scripts.len(), 1);
        assert!(scripts[0].contains("\"c\""));
    }

    #[test]
    fn test_rapid_replacements_inject_in_order() {
        let (handle, mut rx) = unready();
        handle.mark_ready();
        let mut reloader = DataReloader::new(data_with("a"), true);
        reloader.update(&handle, data_with("first"), true);
        reloader.update(&handle, data_with("second"), true);

        let scripts = drain(&mut rx);
        assert_eq!(scripts.len(), 2);
        assert!(scripts[1].contains("second"));
        assert!(reloader.current().nodes[0].label.as_deref() == Some("second"));
    }

    #[test]
    fn test_options_reference_tracking() {
        let (handle, mut rx) = unready();
        handle.mark_ready();
        let mut reloader = OptionsReloader::new(None);
        assert_eq!(reloader.update(&handle, None), ReloadOutcome::Unchanged);

        let options = Arc::new(Options::default().with_nodes(NodeOptions {
            rest: json!({"shape": "box"}).as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }));
        assert_eq!(
            reloader.update(&handle, Some(options.clone())),
            ReloadOutcome::Applied
        );
        assert_eq!(
            reloader.update(&handle, Some(options)),
            ReloadOutcome::Unchanged
        );
        assert_eq!(reloader.update(&handle, None), ReloadOutcome::Applied);

        let scripts = drain(&mut rx);
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].contains(r#"JSON.parse("{\"shape\":\"box\"}")"#));
        assert!(scripts[1].contains("setOptions({})"));
    }

    #[test]
    fn test_options_missed_before_ready() {
        let (handle, mut rx) = unready();
        let mut reloader = OptionsReloader::new(None);
        assert_eq!(
            reloader.update(&handle, Some(Arc::new(Options::default()))),
            ReloadOutcome::Missed
        );
        handle.mark_ready();
        assert!(drain(&mut rx).is_empty());
        assert_eq!(reloader.replay(&handle), ReloadOutcome::Applied);
        assert_eq!(drain(&mut rx).len(), 1);
    }
}
