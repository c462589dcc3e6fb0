//! Core reload monitor implementation.
//!
//! Contains the [`ReloadMonitor`], which drives [`ConfigStore::update`]
//! from file events and a poll timer and publishes version changes.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, watch};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::store::ConfigStore;
use crate::version::VersionVector;
use crate::watcher::DataFileWatcher;

/// A move of the stored version vector from one value to another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VersionChange {
    pub previous: VersionVector,
    pub current: VersionVector,
    /// Settings must be re-read.
    pub config_changed: bool,
    /// Resources built from the data files must be rebuilt.
    pub full_reload_needed: bool,
}

impl VersionChange {
    pub fn between(previous: VersionVector, current: VersionVector) -> Self {
        Self {
            previous,
            current,
            config_changed: previous.config_differs(&current),
            full_reload_needed: previous.data_differs(&current),
        }
    }
}

/// Publishes version changes of a [`ConfigStore`].
pub struct ReloadMonitor {
    store: Arc<ConfigStore>,
    poll_interval: Duration,
}

impl ReloadMonitor {
    /// Start monitoring `store` in a background task.
    ///
    /// Returns the version at start and a receiver that sees a new
    /// [`VersionChange`] whenever the stored version moves. The store is
    /// checked on every poll tick and whenever a tracked file changes; a
    /// file event bypasses the store's throttle window. If no file watcher
    /// can be created, the monitor keeps polling. The task, and the file
    /// watcher it owns, stop once every receiver is dropped.
    pub async fn start(
        store: Arc<ConfigStore>,
        poll_interval: Duration,
    ) -> (VersionVector, watch::Receiver<VersionChange>) {
        let initial = store.version();
        let (change_tx, change_rx) = watch::channel(VersionChange::between(initial, initial));

        let monitor = ReloadMonitor {
            store,
            poll_interval,
        };
        tokio::spawn(async move {
            monitor.run(initial, change_tx).await;
        });

        (initial, change_rx)
    }

    async fn run(&self, mut published: VersionVector, change_tx: watch::Sender<VersionChange>) {
        let watcher = match DataFileWatcher::new(self.store.paths()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                warn!("file watching unavailable ({e}), polling only");
                None
            }
        };
        let mut watching = watcher.is_some();

        // Polled in this task so the notify watcher is dropped with the monitor.
        let (signal_tx, mut signal_rx) = broadcast::channel::<()>(16);
        let watch_files = async {
            if let Some(watcher) = &watcher {
                if let Err(e) = watcher.watch(signal_tx).await {
                    error!("data file watcher error: {e}");
                }
            }
        };
        tokio::pin!(watch_files);

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut watch_files, if watching => {
                    info!("data file watcher stopped, polling only");
                    watching = false;
                    continue;
                }
                signal = signal_rx.recv(), if watching => match signal {
                    Ok(()) => self.store.expire_throttle(),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("data file watcher lagged by {n} events");
                        self.store.expire_throttle();
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        watching = false;
                        continue;
                    }
                },
            }

            if change_tx.is_closed() {
                info!("all version receivers dropped, stopping reload monitor");
                break;
            }

            self.store.update();
            let current = self.store.version();
            if current == published {
                continue;
            }

            let change = VersionChange::between(published, current);
            info!(
                config_changed = change.config_changed,
                full_reload_needed = change.full_reload_needed,
                "config version changed"
            );
            if change_tx.send(change).is_err() {
                info!("all version receivers dropped, stopping reload monitor");
                break;
            }
            published = current;
        }
    }
}
