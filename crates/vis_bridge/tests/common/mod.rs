//! Fake embedded content for end-to-end bridge tests.
//!
//! A QuickJS context stands in for the webview page: it provides a mock
//! `vis.Network`, a `document` with a single container, and a
//! `window.ipc.postMessage` that collects posted envelopes in an outbox.

#![allow(dead_code)]

use rquickjs::{Context, Runtime, Value as JsValue};
use serde_json::Value;
use tokio::sync::mpsc;

use vis_bridge::page::bootstrap_script;
use vis_bridge::{BridgeConfig, BridgeHandle, Dispatch, ScriptChannel};
use vis_types::{Data, Options};

const PRELUDE: &str = r#"
globalThis.window = globalThis;
window.__outbox = [];
window.ipc = { postMessage: (message) => window.__outbox.push(message) };
window.document = { getElementById: (id) => ({ id }) };

class DataSet {
  constructor(items) { this.items = items || []; }
}

class Network {
  constructor(container, data, options) {
    this.container = container;
    this.data = data;
    this.options = options;
    this.handlers = {};
    this.positions = {};
    this.selection = { nodes: [], edges: [] };
    this.scale = 1;
    this.fits = [];
    this.destroyed = false;
  }
  on(name, callback) { (this.handlers[name] = this.handlers[name] || []).push(callback); }
  once(name, callback) {
    const wrapper = (params) => { this.off(name, wrapper); callback(params); };
    this.on(name, wrapper);
  }
  off(name, callback) {
    this.handlers[name] = (this.handlers[name] || []).filter((h) => h !== callback);
  }
  emit(name, params) { (this.handlers[name] || []).slice().forEach((h) => h(params)); }
  listenerCount(name) { return (this.handlers[name] || []).length; }
  setData(data) { this.data = data; }
  setOptions(options) { this.options = options; }
  fit(options) { this.fits.push(options === undefined ? null : options); }
  moveNode(id, x, y) { this.positions[id] = { x, y }; }
  getPositions(ids) {
    const all = this.positions;
    if (ids === undefined) { return all; }
    const picked = {};
    ids.forEach((id) => { if (all[id]) { picked[id] = all[id]; } });
    return picked;
  }
  getScale() { return this.scale; }
  getNodeAt(position) { return undefined; }
  selectNodes(ids) { this.selection = { nodes: ids, edges: [] }; }
  getSelection() { return this.selection; }
  unselectAll() { this.selection = { nodes: [], edges: [] }; }
  deleteSelected() { throw new Error('deleteSelected is not supported'); }
  destroy() { this.destroyed = true; }
}

window.vis = { DataSet, Network };
"#;

/// The page side of the boundary
pub struct FakeEmbeddedContent {
    _runtime: Runtime,
    context: Context,
}

impl FakeEmbeddedContent {
    pub fn new() -> Self {
        let runtime = Runtime::new().unwrap();
        let context = Context::full(&runtime).unwrap();
        let page = Self {
            _runtime: runtime,
            context,
        };
        page.run(PRELUDE).unwrap();
        page
    }

    /// Evaluate a script; a thrown exception comes back as an error string
    pub fn run(&self, script: &str) -> Result<(), String> {
        self.context.with(|ctx| {
            let result: rquickjs::Result<JsValue> = ctx.eval(script);
            result.map(|_| ()).map_err(|e| {
                let _ = ctx.catch();
                e.to_string()
            })
        })
    }

    /// Evaluate an expression and return it through JSON
    pub fn eval_json(&self, expression: &str) -> Value {
        let json: String = self
            .context
            .with(|ctx| ctx.eval(format!("JSON.stringify({})", expression)))
            .unwrap();
        serde_json::from_str(&json).unwrap()
    }

    /// Take every envelope posted since the last call
    pub fn take_outbox(&self) -> Vec<String> {
        serde_json::from_value(self.eval_json("window.__outbox.splice(0)")).unwrap()
    }
}

/// Bridge handle wired to a fake page
pub struct Harness {
    pub handle: BridgeHandle,
    pub page: FakeEmbeddedContent,
    scripts: mpsc::UnboundedReceiver<String>,
    pub errors: Vec<String>,
}

impl Harness {
    /// Render the bootstrap script into the page without loading it yet
    pub fn unready(data: &Data, options: Option<&Options>, config: BridgeConfig) -> Self {
        let (webview, scripts) = ScriptChannel::new();
        let handle = BridgeHandle::new(webview, config);
        let page = FakeEmbeddedContent::new();
        let bootstrap = bootstrap_script(
            handle.instance_key(),
            "container",
            data,
            options,
            handle.config(),
        );
        page.run(&bootstrap).unwrap();
        Self {
            handle,
            page,
            scripts,
            errors: Vec::new(),
        }
    }

    pub fn load(data: &Data, options: Option<&Options>) -> Self {
        Self::load_with(data, options, BridgeConfig::default())
    }

    pub fn load_with(data: &Data, options: Option<&Options>, config: BridgeConfig) -> Self {
        let harness = Self::unready(data, options, config);
        harness.handle.mark_ready();
        harness
    }

    /// Expression evaluating to this instance's network inside the page
    pub fn network(&self) -> String {
        format!(
            "window.visNetworkBridges[{}].network",
            serde_json::to_string(self.handle.instance_key()).unwrap()
        )
    }

    pub fn emit(&self, event: &str, params: Value) {
        self.page
            .run(&format!(
                "{}.emit({}, {});",
                self.network(),
                serde_json::to_string(event).unwrap(),
                params
            ))
            .unwrap();
    }

    pub fn emit_without_params(&self, event: &str) {
        self.page
            .run(&format!(
                "{}.emit({});",
                self.network(),
                serde_json::to_string(event).unwrap()
            ))
            .unwrap();
    }

    /// Run pending injected scripts without dispatching what they post
    pub fn run_scripts(&mut self) -> usize {
        let mut count = 0;
        while let Ok(script) = self.scripts.try_recv() {
            count += 1;
            if let Err(e) = self.page.run(&script) {
                self.errors.push(e);
            }
        }
        count
    }

    /// Run injected scripts and feed posted envelopes back until quiet
    pub fn pump(&mut self) -> Vec<Dispatch> {
        let mut dispatches = Vec::new();
        loop {
            let mut progressed = self.run_scripts() > 0;
            for message in self.page.take_outbox() {
                progressed = true;
                dispatches.push(self.handle.handle_message(&message));
            }
            if !progressed {
                return dispatches;
            }
        }
    }

    pub fn injected_count(&mut self) -> usize {
        let mut count = 0;
        while self.scripts.try_recv().is_ok() {
            count += 1;
        }
        count
    }
}
