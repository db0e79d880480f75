//! vis-network
//!
//! Renders the host page for an embedded vis-network and inspects messages
//! posted back by it.

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vis_bridge::ScriptChannel;
use vis_network::{ConfigWatcher, HostConfig, VisNetwork, describe_message};

/// Embedded vis-network page tooling
#[derive(Parser, Debug)]
#[command(name = "vis-network")]
#[command(about = "Embedded vis-network page tooling", long_about = None)]
struct Args {
    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the host HTML page for a config file
    Render {
        /// Path to the config file
        #[arg(short, long, default_value = "vis-network.toml")]
        config: PathBuf,

        /// Output HTML file
        #[arg(short, long, default_value = "vis-network.html")]
        out: PathBuf,

        /// Re-render whenever the config or graph file changes
        #[arg(long)]
        watch: bool,
    },
    /// Classify posted messages, one JSON envelope per line
    Decode {
        /// Input file; stdin when omitted
        input: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_format);

    match args.command {
        Command::Render { config, out, watch } => {
            let graph_path = render(&config, &out)?;
            if watch {
                watch_and_render(&config, &out, graph_path).await?;
            }
        }
        Command::Decode { input } => decode(input.as_deref())?,
    }
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vis_network=info,vis_bridge=info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn config_dir(config_path: &Path) -> &Path {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Render the page once; returns the graph file to watch, if any
fn render(config_path: &Path, out: &Path) -> Result<Option<PathBuf>> {
    let config = HostConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let base_dir = config_dir(config_path);
    let graph = config.graph(base_dir)?;

    // Nothing is injected while rendering, so the script receiver is unused
    let (webview, _scripts) = ScriptChannel::new();
    let network = VisNetwork::new(
        webview,
        Arc::new(graph.data),
        graph.options.map(Arc::new),
        config.bridge.clone(),
        config.page.clone(),
    );

    std::fs::write(out, network.page_html())
        .with_context(|| format!("writing {}", out.display()))?;
    info!(
        "Rendered {} (instance key {})",
        out.display(),
        network.handle().instance_key()
    );
    if config.bridge.instance_key.is_none() {
        warn!(
            "No bridge.instance_key configured; the generated key is in the container's data-instance-key attribute"
        );
    }
    Ok(config.graph_path(base_dir))
}

async fn watch_and_render(
    config_path: &Path,
    out: &Path,
    graph_path: Option<PathBuf>,
) -> Result<()> {
    let mut files = vec![config_path.to_path_buf()];
    files.extend(graph_path);
    let mut watcher = ConfigWatcher::new(&files).context("starting file watcher")?;

    loop {
        tokio::select! {
            changed = watcher.changed() => {
                let Some(path) = changed else { break };
                info!("{} changed, re-rendering", path.display());
                match render(config_path, out) {
                    Ok(graph_path) => {
                        let graph_file_moved = graph_path.is_some_and(|p| !files.contains(&p));
                        if graph_file_moved {
                            info!("Graph file changed location; restart to watch it");
                        }
                    }
                    Err(e) => warn!("Render failed: {:#}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watcher");
                break;
            }
        }
    }
    Ok(())
}

fn decode(input: Option<&Path>) -> Result<()> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    for line in reader.lines() {
        let line = line.context("reading input")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        println!("{}", describe_message(line));
    }
    Ok(())
}
