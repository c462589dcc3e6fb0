//! Core file watcher implementation.
//!
//! Contains the [`DataFileWatcher`] struct that monitors the settings file
//! and the data files using the `notify` crate, with debounced
//! notifications.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use cinbase_common::ConfigError;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::broadcast;
use tracing::{debug, error, info};

use crate::paths::{PathResolver, CONFIG_FILE_NAME};
use crate::version::DataFile;

/// Coalescing window for bursts of file events.
const DEBOUNCE_MS: u64 = 500;

/// Watches the directories holding tracked files and signals changes.
pub struct DataFileWatcher {
    dirs: Vec<PathBuf>,
    file_names: Vec<OsString>,
}

impl DataFileWatcher {
    /// Watch the user config directory and the bundled data directory.
    ///
    /// Directories that do not exist are skipped; at least one must exist.
    pub fn new(paths: &PathResolver) -> Result<Self, ConfigError> {
        let dirs: Vec<PathBuf> = paths
            .data_search_dirs()
            .into_iter()
            .filter(|dir| dir.is_dir())
            .collect();
        if dirs.is_empty() {
            return Err(ConfigError::WatchError(
                "no config or data directory exists to watch".into(),
            ));
        }

        let file_names = std::iter::once(CONFIG_FILE_NAME)
            .chain(DataFile::ALL.iter().map(|f| f.file_name()))
            .map(OsString::from)
            .collect();

        Ok(Self { dirs, file_names })
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Whether `path` names one of the tracked files.
    pub fn is_tracked(&self, path: &Path) -> bool {
        names_file(&self.file_names, path)
    }

    /// Watch for changes, sending `()` on `tx` after each debounced burst.
    ///
    /// Runs until the underlying watcher goes away or a signal finds no
    /// receiver left on `tx`.
    pub async fn watch(&self, tx: broadcast::Sender<()>) -> Result<(), ConfigError> {
        let (notify_tx, mut notify_rx) = tokio::sync::mpsc::channel::<()>(16);

        let file_names = self.file_names.clone();
        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        return;
                    }
                    if event.paths.iter().any(|p| names_file(&file_names, p)) {
                        debug!("tracked file change detected");
                        let _ = notify_tx.try_send(());
                    }
                }
                Err(e) => {
                    error!("file watcher error: {e}");
                }
            },
            notify::Config::default(),
        )
        .map_err(|e| ConfigError::WatchError(format!("failed to create watcher: {e}")))?;

        for dir in &self.dirs {
            watcher
                .watch(dir, RecursiveMode::NonRecursive)
                .map_err(|e| {
                    ConfigError::WatchError(format!("failed to watch {}: {e}", dir.display()))
                })?;
            info!("watching {} for config changes", dir.display());
        }

        // `watcher` must stay alive for the callbacks to keep firing
        loop {
            if notify_rx.recv().await.is_none() {
                break;
            }

            let debounce = tokio::time::sleep(std::time::Duration::from_millis(DEBOUNCE_MS));
            tokio::pin!(debounce);

            loop {
                tokio::select! {
                    _ = &mut debounce => break,
                    msg = notify_rx.recv() => {
                        if msg.is_none() {
                            return Ok(());
                        }
                    }
                }
            }

            debug!("sending change signal");
            if tx.send(()).is_err() {
                debug!("no receivers for change signal, stopping watcher");
                return Ok(());
            }
        }

        Ok(())
    }
}

fn names_file(file_names: &[OsString], path: &Path) -> bool {
    path.file_name()
        .map(|name| file_names.iter().any(|tracked| tracked == name))
        .unwrap_or(false)
}
