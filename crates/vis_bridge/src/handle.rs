//! Bridge Handle
//!
//! The imperative surface exposed to the host application. Every call turns
//! into an injected script; result-bearing calls additionally register a
//! one-shot callback and hand back a future that resolves when the matching
//! `MethodResult` envelope arrives through [`BridgeHandle::handle_message`].
//!
//! Before the embedded content has loaded, every operation is a no-op that
//! logs a warning. Nothing is queued for later.
//!
//! Fire-and-forget calls have no failure channel: an exception thrown inside
//! the embedded content is never observed here.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use vis_types::{
    BoundingBox, ConnectedNodes, Data, DirectionType, FitOptions, FocusOptions, IdType,
    MoveToOptions, NetworkEvent, Options, Position, Positions, Selection, SelectionOptions,
};

use crate::cache::{CallbackCache, CallbackId};
use crate::codec::{self, BoundaryMessage};
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::script::{ScriptBuilder, is_method_name};
use crate::state::{BridgeState, ReadyLatch};
use crate::webview::WebView;

/// Future returned by result-bearing calls
pub type PendingResult<T> = BoxFuture<'static, Result<T, BridgeError>>;

/// Outcome of dispatching one inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Delivered to a registered callback
    Delivered,
    /// Well-formed, but no callback is registered under its id
    Missing,
    /// Malformed or unrecognized; discarded
    Dropped,
}

// ─────────────────────────────────────────────────────────────────────────────
// Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to the network living inside the embedded content
///
/// Cheap to clone; clones share the callback cache and readiness state.
#[derive(Clone)]
pub struct BridgeHandle {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    webview: Box<dyn WebView>,
    cache: CallbackCache,
    scripts: ScriptBuilder,
    instance_key: String,
    latch: ReadyLatch,
    config: BridgeConfig,
}

impl BridgeHandle {
    /// Create an unready handle bound to `webview`
    pub fn new(webview: impl WebView, config: BridgeConfig) -> Self {
        let instance_key = config
            .instance_key
            .clone()
            .unwrap_or_else(|| CallbackId::generate().to_string());
        let scripts = ScriptBuilder::new(&instance_key, config.post_message.clone());
        debug!("Created bridge handle for instance {}", instance_key);

        Self {
            inner: Arc::new(BridgeInner {
                webview: Box::new(webview),
                cache: CallbackCache::new(),
                scripts,
                instance_key,
                latch: ReadyLatch::new(),
                config,
            }),
        }
    }

    /// Key the host page must register the network under
    pub fn instance_key(&self) -> &str {
        &self.inner.instance_key
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    pub fn cache(&self) -> &CallbackCache {
        &self.inner.cache
    }

    pub fn scripts(&self) -> &ScriptBuilder {
        &self.inner.scripts
    }

    pub fn state(&self) -> BridgeState {
        self.inner.latch.state()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == BridgeState::Ready
    }

    /// Record that the embedded content finished loading
    ///
    /// Returns true on the Unready -> Ready transition, false afterwards.
    pub fn mark_ready(&self) -> bool {
        let opened = self.inner.latch.open();
        if opened {
            info!("vis-network bridge {} is ready", self.inner.instance_key);
        } else {
            debug!("Ignoring repeated load-end for {}", self.inner.instance_key);
        }
        opened
    }

    /// Wait until the embedded content has finished loading
    pub async fn ready(&self) {
        self.inner.latch.wait().await;
    }

    fn ensure_ready(&self, operation: &str) -> bool {
        if self.is_ready() {
            return true;
        }
        warn!(
            "vis-network bridge {} not ready; ignoring {}",
            self.inner.instance_key, operation
        );
        false
    }

    /// Inject a raw script, gated on readiness
    pub fn inject(&self, operation: &str, script: &str) -> bool {
        if !self.ensure_ready(operation) {
            return false;
        }
        self.inner.webview.inject_javascript(script);
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inbound
    // ─────────────────────────────────────────────────────────────────────────

    /// Decode one inbound message and fire the matching callback
    ///
    /// Never fails: malformed payloads and unknown ids are logged and dropped.
    pub fn handle_message(&self, raw: &str) -> Dispatch {
        let message = match codec::decode(raw) {
            Ok(message) => message,
            Err(e) => {
                warn!("Unable to parse message from webview ({}): {}", e, raw);
                return Dispatch::Dropped;
            }
        };

        let delivered = match message {
            BoundaryMessage::Event {
                event_name,
                callback_id,
                payload,
            } => {
                debug!("Event {} for {}", event_name, callback_id);
                self.inner.cache.resolve_repeating(callback_id.as_str(), payload)
            }
            BoundaryMessage::MethodResult {
                callback_id,
                result,
            } => self.inner.cache.resolve_once(callback_id.as_str(), result),
        };

        if delivered {
            Dispatch::Delivered
        } else {
            Dispatch::Missing
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Calls
    // ─────────────────────────────────────────────────────────────────────────

    fn send(&self, method: &str, params: Vec<Value>) {
        if !self.ensure_ready(method) {
            return;
        }
        let script = self.inner.scripts.call(method, &params);
        self.inner.webview.inject_javascript(&script);
    }

    fn send_with_result<T>(&self, method: &str, params: Vec<Value>) -> PendingResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if !self.ensure_ready(method) {
            return future::ready(Err(BridgeError::NotReady)).boxed();
        }

        let (tx, rx) = oneshot::channel::<Value>();
        let id = self.inner.cache.register_once(move |result| {
            let _ = tx.send(result);
        });
        let script = self.inner.scripts.call_with_result(method, &params, &id);
        self.inner.webview.inject_javascript(&script);

        let cache = self.inner.cache.clone();
        let timeout = self.inner.config.call_timeout();
        let method = method.to_string();

        async move {
            let received = match timeout {
                Some(after) => match tokio::time::timeout(after, rx).await {
                    Ok(received) => received,
                    Err(_) => {
                        cache.remove(id.as_str());
                        warn!("{} timed out after {:?}", method, after);
                        return Err(BridgeError::Timeout { method, after });
                    }
                },
                None => rx.await,
            };
            let value = received.map_err(|_| BridgeError::ChannelClosed {
                method: method.clone(),
            })?;
            serde_json::from_value(value)
                .map_err(|source| BridgeError::UnexpectedResult { method, source })
        }
        .boxed()
    }

    /// Fire-and-forget call of any network method
    pub fn invoke(&self, method: &str, params: Vec<Value>) -> Result<(), BridgeError> {
        if !is_method_name(method) {
            return Err(BridgeError::InvalidMethod(method.to_string()));
        }
        self.send(method, params);
        Ok(())
    }

    /// Result-bearing call of any network method
    pub fn invoke_with_result<T>(&self, method: &str, params: Vec<Value>) -> PendingResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        if !is_method_name(method) {
            return future::ready(Err(BridgeError::InvalidMethod(method.to_string()))).boxed();
        }
        self.send_with_result(method, params)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────────────────

    /// Subscribe `callback` to `event`
    ///
    /// The callback receives the envelope fields (event name included) minus
    /// the correlation id.
    pub fn add_event_listener<F>(
        &self,
        event: NetworkEvent,
        callback: F,
    ) -> Result<EventSubscription, BridgeError>
    where
        F: FnMut(Value) + Send + 'static,
    {
        if !self.ensure_ready(event.as_str()) {
            return Err(BridgeError::NotReady);
        }
        let id = self.inner.cache.register_repeating(callback);
        let script = self.inner.scripts.add_event_listener(event, &id);
        self.inner.webview.inject_javascript(&script);
        debug!("Subscribed {} to {}", id, event);

        Ok(EventSubscription {
            handle: self.clone(),
            event,
            id,
            removed: AtomicBool::new(false),
        })
    }

    fn remove_event_listener(&self, event: NetworkEvent, id: &CallbackId) {
        let script = self.inner.scripts.remove_event_listener(event, id);
        self.inner.webview.inject_javascript(&script);
        self.inner.cache.remove(id.as_str());
        debug!("Unsubscribed {} from {}", id, event);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reloads
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the data set wholesale, optionally fitting after stabilization
    pub fn reload_data(&self, data: &Data, zoom_fit_on_stabilized: bool) -> bool {
        let fit = zoom_fit_on_stabilized.then_some(self.inner.config.fit_max_zoom_level);
        let script = self.inner.scripts.set_data(data, fit);
        self.inject("setData", &script)
    }

    /// Replace the options tree, chosen callbacks included
    pub fn reload_options(&self, options: Option<&Options>) -> bool {
        let script = self.inner.scripts.set_options(options);
        self.inject("setOptions", &script)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fire-and-forget surface
    // ─────────────────────────────────────────────────────────────────────────

    pub fn add_edge_mode(&self) {
        self.send("addEdgeMode", vec![]);
    }

    pub fn add_node_mode(&self) {
        self.send("addNodeMode", vec![]);
    }

    pub fn delete_selected(&self) {
        self.send("deleteSelected", vec![]);
    }

    /// Destroy the embedded network. Pending calls stay pending.
    pub fn destroy(&self) {
        self.send("destroy", vec![]);
    }

    pub fn disable_edit_mode(&self) {
        self.send("disableEditMode", vec![]);
    }

    pub fn enable_edit_mode(&self) {
        self.send("enableEditMode", vec![]);
    }

    pub fn edit_edge_mode(&self) {
        self.send("editEdgeMode", vec![]);
    }

    pub fn edit_node(&self) {
        self.send("editNode", vec![]);
    }

    pub fn fit(&self, options: Option<&FitOptions>) {
        self.send("fit", vec![arg(&options)]);
    }

    pub fn focus(&self, node_id: &IdType, options: Option<&FocusOptions>) {
        self.send("focus", vec![arg(node_id), arg(&options)]);
    }

    pub fn move_node(&self, node_id: &IdType, x: f64, y: f64) {
        self.send("moveNode", vec![arg(node_id), arg(&x), arg(&y)]);
    }

    pub fn move_to(&self, options: &MoveToOptions) {
        self.send("moveTo", vec![arg(options)]);
    }

    pub fn redraw(&self) {
        self.send("redraw", vec![]);
    }

    pub fn release_node(&self) {
        self.send("releaseNode", vec![]);
    }

    pub fn select_edges(&self, edge_ids: &[IdType]) {
        self.send("selectEdges", vec![arg(edge_ids)]);
    }

    pub fn select_nodes(&self, node_ids: &[IdType], highlight_edges: Option<bool>) {
        self.send("selectNodes", vec![arg(node_ids), arg(&highlight_edges)]);
    }

    pub fn set_selection(&self, selection: &Selection, options: Option<&SelectionOptions>) {
        self.send("setSelection", vec![arg(selection), arg(&options)]);
    }

    /// Plain `network.setData(..)` with array data
    pub fn set_data(&self, data: &Data) {
        self.send("setData", vec![arg(data)]);
    }

    /// `network.setOptions(..)` through the options serializer
    pub fn set_options(&self, options: &Options) {
        self.reload_options(Some(options));
    }

    pub fn set_size(&self, width: &str, height: &str) {
        self.send("setSize", vec![arg(width), arg(height)]);
    }

    pub fn stabilize(&self, iterations: Option<u32>) {
        self.send("stabilize", vec![arg(&iterations)]);
    }

    pub fn start_simulation(&self) {
        self.send("startSimulation", vec![]);
    }

    pub fn stop_simulation(&self) {
        self.send("stopSimulation", vec![]);
    }

    pub fn store_positions(&self) {
        self.send("storePositions", vec![]);
    }

    pub fn unselect_all(&self) {
        self.send("unselectAll", vec![]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Result-bearing surface
    // ─────────────────────────────────────────────────────────────────────────

    pub fn canvas_to_dom(&self, position: Position) -> PendingResult<Position> {
        self.send_with_result("canvasToDOM", vec![arg(&position)])
    }

    pub fn dom_to_canvas(&self, position: Position) -> PendingResult<Position> {
        self.send_with_result("DOMtoCanvas", vec![arg(&position)])
    }

    pub fn find_node(&self, node_id: &IdType) -> PendingResult<Vec<IdType>> {
        self.send_with_result("findNode", vec![arg(node_id)])
    }

    pub fn get_base_edge(&self, clustered_edge_id: &IdType) -> PendingResult<IdType> {
        self.send_with_result("getBaseEdge", vec![arg(clustered_edge_id)])
    }

    pub fn get_base_edges(&self, clustered_edge_id: &IdType) -> PendingResult<Vec<IdType>> {
        self.send_with_result("getBaseEdges", vec![arg(clustered_edge_id)])
    }

    pub fn get_bounding_box(&self, node_id: &IdType) -> PendingResult<BoundingBox> {
        self.send_with_result("getBoundingBox", vec![arg(node_id)])
    }

    pub fn get_clustered_edges(&self, base_edge_id: &IdType) -> PendingResult<Vec<IdType>> {
        self.send_with_result("getClusteredEdges", vec![arg(base_edge_id)])
    }

    pub fn get_connected_edges(&self, node_id: &IdType) -> PendingResult<Vec<IdType>> {
        self.send_with_result("getConnectedEdges", vec![arg(node_id)])
    }

    pub fn get_connected_nodes(
        &self,
        node_or_edge_id: &IdType,
        direction: Option<DirectionType>,
    ) -> PendingResult<ConnectedNodes> {
        self.send_with_result(
            "getConnectedNodes",
            vec![arg(node_or_edge_id), arg(&direction)],
        )
    }

    /// Edge under a DOM position; `None` when nothing is hit
    pub fn get_edge_at(&self, position: Position) -> PendingResult<Option<IdType>> {
        self.send_with_result("getEdgeAt", vec![arg(&position)])
    }

    /// Node under a DOM position; `None` when nothing is hit
    pub fn get_node_at(&self, position: Position) -> PendingResult<Option<IdType>> {
        self.send_with_result("getNodeAt", vec![arg(&position)])
    }

    pub fn get_nodes_in_cluster(&self, cluster_node_id: &IdType) -> PendingResult<Vec<IdType>> {
        self.send_with_result("getNodesInCluster", vec![arg(cluster_node_id)])
    }

    pub fn get_options_from_configurator(&self) -> PendingResult<Value> {
        self.send_with_result("getOptionsFromConfigurator", vec![])
    }

    pub fn get_position(&self, node_id: &IdType) -> PendingResult<Position> {
        self.send_with_result("getPosition", vec![arg(node_id)])
    }

    /// Positions of the given nodes, or of every node when `None`
    pub fn get_positions(&self, node_ids: Option<&[IdType]>) -> PendingResult<Positions> {
        self.send_with_result("getPositions", vec![arg(&node_ids)])
    }

    pub fn get_scale(&self) -> PendingResult<f64> {
        self.send_with_result("getScale", vec![])
    }

    pub fn get_seed(&self) -> PendingResult<IdType> {
        self.send_with_result("getSeed", vec![])
    }

    pub fn get_selected_edges(&self) -> PendingResult<Vec<IdType>> {
        self.send_with_result("getSelectedEdges", vec![])
    }

    pub fn get_selected_nodes(&self) -> PendingResult<Vec<IdType>> {
        self.send_with_result("getSelectedNodes", vec![])
    }

    pub fn get_selection(&self) -> PendingResult<Selection> {
        self.send_with_result("getSelection", vec![])
    }

    pub fn get_view_position(&self) -> PendingResult<Position> {
        self.send_with_result("getViewPosition", vec![])
    }

    pub fn is_cluster(&self, node_id: &IdType) -> PendingResult<bool> {
        self.send_with_result("isCluster", vec![arg(node_id)])
    }
}

impl std::fmt::Debug for BridgeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeHandle")
            .field("instance_key", &self.inner.instance_key)
            .field("state", &self.state())
            .field("cache", &self.inner.cache)
            .finish()
    }
}

/// Serialize a call argument; `None` becomes `null` and is trimmed if trailing
fn arg<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        warn!("Failed to serialize call argument: {}", e);
        Value::Null
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Subscription
// ─────────────────────────────────────────────────────────────────────────────

/// Returned by [`BridgeHandle::add_event_listener`]
///
/// Dropping the subscription does not unsubscribe; call [`remove`](Self::remove).
pub struct EventSubscription {
    handle: BridgeHandle,
    event: NetworkEvent,
    id: CallbackId,
    removed: AtomicBool,
}

impl EventSubscription {
    pub fn event(&self) -> NetworkEvent {
        self.event
    }

    pub fn id(&self) -> &CallbackId {
        &self.id
    }

    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }

    /// Detach the listener and evict its callback. Safe to call repeatedly.
    ///
    /// Best effort: events already posted by the embedded content may still
    /// arrive and are dropped as misses.
    pub fn remove(&self) {
        if self.removed.swap(true, Ordering::SeqCst) {
            debug!("Subscription {} already removed", self.id);
            return;
        }
        self.handle.remove_event_listener(self.event, &self.id);
    }
}

impl std::fmt::Debug for EventSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubscription")
            .field("event", &self.event)
            .field("id", &self.id)
            .field("removed", &self.is_removed())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
