//! Host Configuration
//!
//! `vis-network.toml` layout:
//!
//! ```toml
//! graph_file = "graph.json"   # optional, overrides inline data/options
//!
//! [bridge]
//! zoom_fit_on_stabilized = true
//! call_timeout_ms = 5000
//!
//! [page]
//! title = "Network"
//!
//! [[data.nodes]]
//! id = 1
//! label = "one"
//! ```
//!
//! Any key can be overridden from the environment with the `VIS_NETWORK_`
//! prefix, nesting with `__` (`VIS_NETWORK_BRIDGE__CALL_TIMEOUT_MS=250`).

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use vis_bridge::{BridgeConfig, PageConfig};
use vis_types::{Data, Options};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "VIS_NETWORK_";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] figment::Error),

    #[error("Failed to read graph file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid graph file {path}: {source}")]
    Graph {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the `vis-network` binary needs to render a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub bridge: BridgeConfig,
    pub page: PageConfig,
    pub data: Data,
    pub options: Option<Options>,
    /// JSON file holding `{ "data": .., "options": .. }`, relative to the config file
    pub graph_file: Option<PathBuf>,
}

/// Graph data and options, inline or from a graph file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Graph {
    pub data: Data,
    pub options: Option<Options>,
}

impl HostConfig {
    /// Load a config file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::figment(path).extract().map_err(ConfigError::from)
    }

    pub fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Resolve `graph_file` against `base_dir`
    pub fn graph_path(&self, base_dir: &Path) -> Option<PathBuf> {
        self.graph_file.as_ref().map(|file| base_dir.join(file))
    }

    /// Graph to render: the graph file when set, otherwise the inline trees
    pub fn graph(&self, base_dir: &Path) -> Result<Graph, ConfigError> {
        let Some(path) = self.graph_path(base_dir) else {
            return Ok(Graph {
                data: self.data.clone(),
                options: self.options.clone(),
            });
        };

        debug!("Reading graph from {}", path.display());
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Graph { path, source })
    }
}
