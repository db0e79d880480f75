//! Host page
//!
//! Builds the HTML document loaded into the webview. The page pulls
//! vis-network from the CDN, constructs the network from the initial data and
//! options, and registers it under the bridge's instance key so injected
//! scripts can find it. The key is also written to the container's
//! `data-instance-key` attribute for hosts that did not configure one.

use serde::{Deserialize, Serialize};

use vis_types::{Data, Options};

use crate::config::BridgeConfig;
use crate::script::INSTANCE_REGISTRY;
use crate::serializer::{options_expression, to_js};

/// Page-level presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub title: String,
    /// CSS height of the network container
    pub height: String,
    pub container_id: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "vis-network".to_string(),
            height: "100vh".to_string(),
            container_id: "container".to_string(),
        }
    }
}

/// Script constructing the network and registering it under `instance_key`
pub fn bootstrap_script(
    instance_key: &str,
    container_id: &str,
    data: &Data,
    options: Option<&Options>,
    config: &BridgeConfig,
) -> String {
    let mut script = format!(
        "(function () {{
  const nodes = new vis.DataSet({nodes});
  const edges = new vis.DataSet({edges});
  const container = document.getElementById({container});
  const options = {options};
  const network = new vis.Network(container, {{ edges, nodes }}, options);
  window.{registry} = window.{registry} || {{}};
  window.{registry}[{key}] = {{ network, callbacks: {{}} }};",
        nodes = to_js(&data.nodes),
        edges = to_js(&data.edges),
        container = to_js(container_id),
        options = options_expression(options),
        registry = INSTANCE_REGISTRY,
        key = to_js(instance_key),
    );
    if config.zoom_fit_on_stabilized {
        script.push_str(&format!(
            "
  network.once('stabilized', () => {{
    network.fit({{ maxZoomLevel: {} }});
  }});",
            to_js(&config.fit_max_zoom_level),
        ));
    }
    script.push_str("\n})();\n");
    escape_script(&script)
}

/// Complete HTML document for the webview
pub fn render_page(
    instance_key: &str,
    data: &Data,
    options: Option<&Options>,
    config: &BridgeConfig,
    page: &PageConfig,
) -> String {
    let bootstrap = bootstrap_script(instance_key, &page.container_id, data, options, config);
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <script type="text/javascript" src="{src}"></script>
</head>
<body style="margin: 0;">
<div id="{container}" data-instance-key="{key}" style="height: {height};"></div>
<script type="text/javascript">
{bootstrap}</script>
</body>
</html>
"#,
        title = escape_html(&page.title),
        src = escape_html(&config.script_url()),
        container = escape_html(&page.container_id),
        key = escape_html(instance_key),
        height = escape_html(&page.height),
        bootstrap = bootstrap,
    )
}

/// Keep string literals from closing the element or opening a comment
///
/// `<` only occurs inside string literals here, where `\u003c` decodes back.
fn escape_script(script: &str) -> String {
    script.replace('<', "\\u003c")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
