//! Settings store for a cinbase input method.
//!
//! Persists the input method's settings as JSON under the user's config
//! directory and tracks the modification times of the settings file and
//! the data files (`symbols.dat`, `swkb.dat`, `fsymbols.dat`,
//! `flangs.dat`, `userphrase.dat`) as a [`VersionVector`]. Callers run
//! [`ConfigStore::update`] before reading settings; it reloads the
//! settings when their file changed and records the new version, at most
//! once every [`UPDATE_THROTTLE_SECS`] seconds.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cinbase_config::{ConfigStore, PathResolver};
//!
//! let paths = PathResolver::for_ime("chewing").expect("no home directory");
//! let store = ConfigStore::open(paths);
//!
//! let seen = store.version();
//! // ... later, before using the settings:
//! store.update();
//! if store.is_full_reload_needed(&seen) {
//!     // rebuild anything built from the data files
//! } else if store.is_config_changed(&seen) {
//!     // re-read display settings
//! }
//! println!("font size: {}", store.settings().font_size);
//! ```

pub mod clock;
pub mod json_loader;
pub mod json_writer;
pub mod paths;
pub mod reload;
pub mod schema;
pub mod store;
pub mod validation;
pub mod version;
pub mod watcher;

pub use clock::{Clock, ManualClock, SystemClock};
pub use json_writer::{save_to_path, settings_to_json};
pub use paths::{find_first, PathResolver, CONFIG_FILE_NAME};
pub use reload::{ReloadMonitor, VersionChange};
pub use schema::{SettingsRecord, DEFAULT_FONT_SIZE, SELECTION_KEYS};
pub use store::{ConfigStore, StoreStats, UPDATE_THROTTLE_SECS};
pub use version::{DataFile, VersionVector};
pub use watcher::DataFileWatcher;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_json_contains_every_section_of_the_schema() {
        let json = settings_to_json(&SettingsRecord::default()).unwrap();
        assert!(json.contains("\"candPerRow\": 3"));
        assert!(json.contains("\"fontSize\": 16"));
        assert!(json.contains("\"cinFileList\": []"));
        assert!(json.contains("\"keyboardType\": 0"));
    }

    #[test]
    fn throttle_is_three_seconds() {
        assert_eq!(UPDATE_THROTTLE_SECS, 3.0);
    }

    #[test]
    fn open_loads_immediately() {
        let root = tempfile::tempdir().unwrap();
        let paths = PathResolver::new(root.path().join("user"), root.path().join("install"), "chewing");
        let store = ConfigStore::open(paths.clone());

        assert_eq!(store.stats().loads, 1);
        assert!(paths.config_file_path().unwrap().exists());
    }
}
