//! Script Builder
//!
//! Produces the script text injected into the embedded content. Every script
//! resolves its network through an explicit instance key registered by the
//! host page (`window.visNetworkBridges[key]`) and runs inside its own
//! function scope, so repeated injections never redeclare bindings.
//!
//! Scripts end with `true;` because some webviews report the completion value
//! of an injected script and refuse non-serializable ones.

use serde_json::Value;

use vis_types::{Data, NetworkEvent, Options};

use crate::cache::CallbackId;
use crate::codec::{CALLBACK_ID_FIELD, EVENT_NAME_FIELD};
use crate::serializer::{options_expression, to_js};

/// Global object on the page holding every registered bridge instance
pub const INSTANCE_REGISTRY: &str = "visNetworkBridges";

/// True when `name` can be spliced into `network.<name>(..)` as-is
pub fn is_method_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Builds injected scripts for a single bridge instance
#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    /// JSON-quoted instance key
    key: String,
    post_message: String,
}

impl ScriptBuilder {
    pub fn new(instance_key: &str, post_message: impl Into<String>) -> Self {
        Self {
            key: to_js(instance_key),
            post_message: post_message.into(),
        }
    }

    /// Wrap a body so it runs against this instance's network
    fn scoped(&self, body: &str) -> String {
        format!(
            "(function () {{\n  const bridge = window.{registry} && window.{registry}[{key}];\n  if (!bridge) {{ return; }}\n{body}\n}})();\ntrue;\n",
            registry = INSTANCE_REGISTRY,
            key = self.key,
            body = body,
        )
    }

    /// Fire-and-forget `network.<method>(...params)`
    pub fn call(&self, method: &str, params: &[Value]) -> String {
        self.scoped(&format!("  bridge.network.{}({});", method, arguments(params)))
    }

    /// Call `network.<method>` and post its result tagged with `id`
    ///
    /// `undefined` results are posted as `null` so the envelope keeps its
    /// `result` field.
    pub fn call_with_result(&self, method: &str, params: &[Value], id: &CallbackId) -> String {
        self.scoped(&format!(
            "  const result = bridge.network.{method}({args});\n  {post}(JSON.stringify({{\n    result: result === undefined ? null : result,\n    {id_field}: {id},\n  }}));",
            method = method,
            args = arguments(params),
            post = self.post_message,
            id_field = CALLBACK_ID_FIELD,
            id = to_js(id.as_str()),
        ))
    }

    /// Attach a listener that posts every occurrence of `event` tagged with `id`
    ///
    /// Object params are spread into the envelope minus the raw DOM `event`,
    /// which is not serializable. Other params travel under `params`.
    pub fn add_event_listener(&self, event: NetworkEvent, id: &CallbackId) -> String {
        let event_name = to_js(event.as_str());
        let id = to_js(id.as_str());
        self.scoped(&format!(
            "  bridge.callbacks[{id}] = (params) => {{\n    let fields = {{}};\n    if (params !== null && typeof params === 'object') {{\n      const {{ event: _domEvent, ...rest }} = params;\n      fields = rest;\n    }} else if (params !== undefined) {{\n      fields = {{ params }};\n    }}\n    {post}(JSON.stringify({{\n      ...fields,\n      {event_field}: {event_name},\n      {id_field}: {id},\n    }}));\n  }};\n  bridge.network.on({event_name}, bridge.callbacks[{id}]);",
            id = id,
            post = self.post_message,
            event_field = EVENT_NAME_FIELD,
            event_name = event_name,
            id_field = CALLBACK_ID_FIELD,
        ))
    }

    /// Detach the listener registered under `id`
    pub fn remove_event_listener(&self, event: NetworkEvent, id: &CallbackId) -> String {
        let id = to_js(id.as_str());
        self.scoped(&format!(
            "  const callback = bridge.callbacks[{id}];\n  if (callback) {{\n    bridge.network.off({event_name}, callback);\n    delete bridge.callbacks[{id}];\n  }}",
            id = id,
            event_name = to_js(event.as_str()),
        ))
    }

    /// Replace the whole data set; optionally fit once layout stabilizes
    pub fn set_data(&self, data: &Data, fit_max_zoom_level: Option<f64>) -> String {
        let mut body = format!(
            "  bridge.network.setData({{\n    edges: new vis.DataSet({}),\n    nodes: new vis.DataSet({}),\n  }});",
            to_js(&data.edges),
            to_js(&data.nodes),
        );
        if let Some(max_zoom_level) = fit_max_zoom_level {
            body.push_str(&format!(
                "\n  bridge.network.once('stabilized', () => {{\n    bridge.network.fit({{ maxZoomLevel: {} }});\n  }});",
                to_js(&max_zoom_level),
            ));
        }
        self.scoped(&body)
    }

    /// Replace the options tree, callbacks included
    pub fn set_options(&self, options: Option<&Options>) -> String {
        self.scoped(&format!(
            "  bridge.network.setOptions({});",
            options_expression(options)
        ))
    }
}

/// Argument list with trailing `null`s dropped so library defaults apply
fn arguments(params: &[Value]) -> String {
    let len = params
        .iter()
        .rposition(|p| !p.is_null())
        .map_or(0, |last| last + 1);
    params[..len]
        .iter()
        .map(|p| to_js(p))
        .collect::<Vec<_>>()
        .join(", ")
}
