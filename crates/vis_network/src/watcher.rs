//! Config File Watcher
//!
//! Watches the config file and the graph file it points at, and reports
//! every change so the page can be re-rendered.

use std::path::{Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Watches a fixed set of files
pub struct ConfigWatcher {
    rx: mpsc::Receiver<PathBuf>,
    /// The underlying watcher (kept alive)
    _watcher: RecommendedWatcher,
}

impl ConfigWatcher {
    /// Watch `files`. Their parent directories are watched so editors that
    /// replace files on save are still picked up.
    pub fn new(files: &[PathBuf]) -> Result<Self, notify::Error> {
        let files: Vec<PathBuf> = files.iter().map(|f| canonical(f)).collect();
        let (tx, rx) = mpsc::channel(16);

        let watched = files.clone();
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if let Some(path) = Self::relevant_path(&watched, &event) {
                        let _ = tx.blocking_send(path);
                    }
                }
                Err(e) => {
                    error!("File watcher error: {}", e);
                }
            }
        })?;

        let mut dirs: Vec<&Path> = files.iter().filter_map(|f| f.parent()).collect();
        dirs.sort();
        dirs.dedup();
        for dir in dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
            info!("Watching directory: {}", dir.display());
        }

        Ok(Self {
            rx,
            _watcher: watcher,
        })
    }

    /// First watched file touched by `event`, if any
    fn relevant_path(files: &[PathBuf], event: &Event) -> Option<PathBuf> {
        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_) => {}
            _ => {
                debug!("Ignoring event kind: {:?}", event.kind);
                return None;
            }
        }
        event
            .paths
            .iter()
            .map(|p| canonical(p))
            .find(|p| files.contains(p))
    }

    /// Wait for the next change
    pub async fn changed(&mut self) -> Option<PathBuf> {
        let path = self.rx.recv().await?;
        // Collapse the burst of events a single save produces
        while self.rx.try_recv().is_ok() {}
        Some(path)
    }
}

fn canonical(path: &Path) -> PathBuf {
    if let Ok(path) = path.canonicalize() {
        return path;
    }
    // Removed files cannot be canonicalized; resolve the directory instead
    match (path.parent().and_then(|p| p.canonicalize().ok()), path.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind};
    use std::time::Duration;

    #[test]
    fn test_relevant_path_filters() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("vis-network.toml");
        std::fs::write(&config, "").unwrap();
        let files = vec![canonical(&config)];

        let touched = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(config.clone());
        assert_eq!(
            ConfigWatcher::relevant_path(&files, &touched),
            Some(canonical(&config))
        );

        let other = Event::new(EventKind::Create(CreateKind::File))
            .add_path(dir.path().join("other.toml"));
        assert_eq!(ConfigWatcher::relevant_path(&files, &other), None);

        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(config);
        assert_eq!(ConfigWatcher::relevant_path(&files, &access), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reports_change() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("vis-network.toml");
        std::fs::write(&config, "[page]\n").unwrap();

        let mut watcher = ConfigWatcher::new(&[config.clone()]).unwrap();
        std::fs::write(&config, "[page]\ntitle = \"x\"\n").unwrap();

        let changed = tokio::time::timeout(Duration::from_secs(5), watcher.changed())
            .await
            .unwrap();
        assert_eq!(changed, Some(canonical(&config)));
    }
}
