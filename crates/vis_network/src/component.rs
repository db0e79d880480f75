//! VisNetwork Component
//!
//! Owns the bridge handle and both reload effectors for one embedded network.
//! The host forwards webview lifecycle signals (`on_load_end`, `on_message`)
//! and hands over new data and options as `Arc`s; a new `Arc` means changed.

use std::sync::Arc;

use tracing::{debug, info};

use vis_bridge::page::render_page;
use vis_bridge::{
    BridgeConfig, BridgeHandle, DataReloader, Dispatch, OptionsReloader, PageConfig,
    ReloadOutcome, WebView,
};
use vis_types::{Data, Options};

pub struct VisNetwork {
    handle: BridgeHandle,
    page: PageConfig,
    data: DataReloader,
    options: OptionsReloader,
}

impl VisNetwork {
    pub fn new(
        webview: impl WebView,
        data: Arc<Data>,
        options: Option<Arc<Options>>,
        config: BridgeConfig,
        page: PageConfig,
    ) -> Self {
        let zoom_fit_on_stabilized = config.zoom_fit_on_stabilized;
        let handle = BridgeHandle::new(webview, config);
        debug!(
            "Created network {} with {} nodes and {} edges",
            handle.instance_key(),
            data.nodes.len(),
            data.edges.len()
        );

        Self {
            handle,
            page,
            data: DataReloader::new(data, zoom_fit_on_stabilized),
            options: OptionsReloader::new(options),
        }
    }

    /// Imperative surface for calls, queries and event listeners
    pub fn handle(&self) -> &BridgeHandle {
        &self.handle
    }

    /// HTML document for the webview, built from the current data and options
    pub fn page_html(&self) -> String {
        render_page(
            self.handle.instance_key(),
            self.data.current(),
            self.options.current().map(|options| options.as_ref()),
            self.handle.config(),
            &self.page,
        )
    }

    /// The webview finished loading the page
    ///
    /// Returns false when the bridge was already ready.
    pub fn on_load_end(&mut self) -> bool {
        if !self.handle.mark_ready() {
            return false;
        }
        if self.handle.config().replay_on_ready {
            let data = self.data.replay(&self.handle);
            let options = self.options.replay(&self.handle);
            if data == ReloadOutcome::Applied || options == ReloadOutcome::Applied {
                info!("Replayed updates missed before load for {}", self.handle.instance_key());
            }
        }
        true
    }

    /// A message posted by the page
    pub fn on_message(&self, raw: &str) -> Dispatch {
        self.handle.handle_message(raw)
    }

    pub fn data(&self) -> &Arc<Data> {
        self.data.current()
    }

    pub fn set_data(&mut self, data: Arc<Data>) -> ReloadOutcome {
        let zoom_fit_on_stabilized = self.data.zoom_fit_on_stabilized();
        self.data.update(&self.handle, data, zoom_fit_on_stabilized)
    }

    /// Toggling the flag re-applies the current data with the new fit behavior
    pub fn set_zoom_fit_on_stabilized(&mut self, enabled: bool) -> ReloadOutcome {
        let data = self.data.current().clone();
        self.data.update(&self.handle, data, enabled)
    }

    pub fn options(&self) -> Option<&Arc<Options>> {
        self.options.current()
    }

    pub fn set_options(&mut self, options: Option<Arc<Options>>) -> ReloadOutcome {
        self.options.update(&self.handle, options)
    }
}

impl std::fmt::Debug for VisNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisNetwork")
            .field("handle", &self.handle)
            .field("data", &self.data)
            .field("options", &self.options)
            .finish()
    }
}
