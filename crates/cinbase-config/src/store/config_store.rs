//! Core store implementation.
//!
//! Contains the [`ConfigStore`] struct: the single source of truth for one
//! input method's settings and the on-disk version those settings were
//! read from.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use cinbase_common::{CinbaseError, ConfigError};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use crate::clock::{Clock, SystemClock};
use crate::json_loader::{merge_from_path, select_source};
use crate::json_writer::save_to_path;
use crate::paths::PathResolver;
use crate::schema::SettingsRecord;
use crate::version::VersionVector;

/// Minimum number of seconds between two stat passes of [`ConfigStore::update`].
pub const UPDATE_THROTTLE_SECS: f64 = 3.0;

/// Counters describing the work a store has done.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Times the tracked files were stat'ed.
    pub stat_passes: u64,
    /// Times the settings were (re)loaded, explicit or change-triggered.
    pub loads: u64,
    /// Successful writes of the settings file.
    pub saves: u64,
}

struct StoreState {
    settings: SettingsRecord,
    version: VersionVector,
    last_check: f64,
    /// Set while a load is in flight so its own refresh cannot trigger
    /// another load.
    reloading: bool,
    stats: StoreStats,
}

/// Settings and file-version state of one input method.
///
/// Construct one per engine instance and share it (for example behind an
/// `Arc`). Every operation locks the whole state, so the store is safe to
/// call from several threads. No operation returns an error: missing or
/// malformed files fall back to defaults and failed writes are logged.
pub struct ConfigStore {
    paths: PathResolver,
    clock: Box<dyn Clock>,
    state: Mutex<StoreState>,
}

impl ConfigStore {
    /// Create a store with compiled-in defaults. Nothing is read from disk
    /// until [`load`](Self::load) or [`update`](Self::update).
    pub fn new(paths: PathResolver) -> Self {
        Self::with_clock(paths, SystemClock)
    }

    pub fn with_clock(paths: PathResolver, clock: impl Clock + 'static) -> Self {
        let settings = SettingsRecord::for_ime(paths.ime_dir_name());
        Self {
            paths,
            clock: Box::new(clock),
            state: Mutex::new(StoreState {
                settings,
                version: VersionVector::default(),
                last_check: f64::NEG_INFINITY,
                reloading: false,
                stats: StoreStats::default(),
            }),
        }
    }

    /// Create a store and load it.
    pub fn open(paths: PathResolver) -> Self {
        let store = Self::new(paths);
        store.load();
        store
    }

    pub fn paths(&self) -> &PathResolver {
        &self.paths
    }

    /// A copy of the current settings.
    pub fn settings(&self) -> SettingsRecord {
        self.lock().settings.clone()
    }

    /// Read the current settings without copying them.
    pub fn with_settings<R>(&self, f: impl FnOnce(&SettingsRecord) -> R) -> R {
        f(&self.lock().settings)
    }

    /// Change settings in memory. Call [`save`](Self::save) to persist.
    pub fn modify<R>(&self, f: impl FnOnce(&mut SettingsRecord) -> R) -> R {
        f(&mut self.lock().settings)
    }

    /// The stored version vector. Does not touch the filesystem.
    pub fn version(&self) -> VersionVector {
        self.lock().version
    }

    pub fn stats(&self) -> StoreStats {
        self.lock().stats
    }

    /// Whether `other` was taken from a different settings file version.
    ///
    /// When true, re-read any settings derived from this store.
    pub fn is_config_changed(&self, other: &VersionVector) -> bool {
        self.lock().version.config_differs(other)
    }

    /// Whether `other` was taken from different data file versions.
    ///
    /// When true, anything built from the data files (symbol tables, a
    /// linguistic context) must be discarded and rebuilt, not refreshed.
    pub fn is_full_reload_needed(&self, other: &VersionVector) -> bool {
        self.lock().version.data_differs(other)
    }

    /// Let the next [`update`](Self::update) stat the files even if the
    /// throttle window has not elapsed.
    pub fn expire_throttle(&self) {
        self.lock().last_check = f64::NEG_INFINITY;
    }

    /// Read the settings file into the current settings.
    ///
    /// Uses the bundled default file when the user's file is missing or
    /// empty. If nothing can be read, the current settings are written out
    /// instead. The version vector is refreshed afterwards.
    pub fn load(&self) {
        let mut state = self.lock();
        self.load_locked(&mut state);
    }

    /// Write the current settings to the user's settings file.
    ///
    /// Failures are logged; the in-memory settings stay authoritative and
    /// the next save tries again.
    pub fn save(&self) {
        let mut state = self.lock();
        self.save_locked(&mut state);
    }

    /// Check the tracked files for changes, reloading the settings if the
    /// settings file changed.
    ///
    /// Does nothing if the last check was less than
    /// [`UPDATE_THROTTLE_SECS`] ago. A clock that stepped back past the last
    /// check counts as an expired window.
    pub fn update(&self) {
        let mut state = self.lock();
        let elapsed = self.clock.now() - state.last_check;
        if (0.0..UPDATE_THROTTLE_SECS).contains(&elapsed) {
            trace!("skipping version check, last one {elapsed:.2}s ago");
            return;
        }
        self.check_locked(&mut state);
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Every mutation leaves the state consistent, so a poisoned lock is
        // still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_locked(&self, state: &mut StoreState) {
        let observed = VersionVector::observe(&self.paths);
        state.stats.stat_passes += 1;

        let previous = std::mem::replace(&mut state.version, observed);
        if previous.config_differs(&observed) {
            if state.reloading {
                debug!("settings file changed during a load, recording version only");
            } else {
                info!("settings file changed on disk, reloading");
                state.reloading = true;
                self.load_locked(state);
                state.reloading = false;
            }
        }

        state.last_check = self.clock.now();
    }

    /// Stat pass that records the new version without reloading.
    fn refresh_locked(&self, state: &mut StoreState) {
        let was_reloading = std::mem::replace(&mut state.reloading, true);
        self.check_locked(state);
        state.reloading = was_reloading;
    }

    fn load_locked(&self, state: &mut StoreState) {
        state.stats.loads += 1;

        let refreshed = match self.read_settings(&mut state.settings) {
            Ok(source) => {
                debug!("settings read from {}", source.display());
                false
            }
            Err(CinbaseError::Config(ConfigError::FileNotFound(path))) => {
                info!("no config found at {}, writing defaults", path.display());
                self.save_locked(state)
            }
            Err(e) => {
                warn!("failed to load config: {e}; writing current settings");
                self.save_locked(state)
            }
        };

        if !refreshed {
            self.refresh_locked(state);
        }
    }

    fn read_settings(&self, settings: &mut SettingsRecord) -> Result<PathBuf, CinbaseError> {
        let user_file = self.paths.config_file_path()?;
        let source = select_source(&user_file, &self.paths.default_config_file());
        merge_from_path(settings, &source)?;
        Ok(source)
    }

    /// Returns whether the file was written (and the version refreshed).
    fn save_locked(&self, state: &mut StoreState) -> bool {
        let written = self
            .paths
            .config_file_path()
            .map_err(CinbaseError::from)
            .and_then(|path| {
                save_to_path(&state.settings, &path)?;
                Ok(path)
            });

        match written {
            Ok(path) => {
                state.stats.saves += 1;
                info!("saved settings to {}", path.display());
                self.refresh_locked(state);
                true
            }
            Err(e) => {
                warn!("failed to save settings: {e}");
                false
            }
        }
    }
}
