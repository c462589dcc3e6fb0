//! Tests for the data file watcher.

use super::*;
use crate::paths::PathResolver;
use std::path::Path;
use std::time::Duration;
use tokio::sync::broadcast;

#[test]
fn watcher_covers_existing_dirs_only() {
    let root = tempfile::tempdir().unwrap();
    let paths = PathResolver::new(root.path().join("user"), root.path().join("install"), "chewing");

    let watcher = DataFileWatcher::new(&paths).unwrap();
    assert_eq!(watcher.dirs(), &[paths.config_dir().unwrap()]);

    std::fs::create_dir_all(paths.data_dir()).unwrap();
    let watcher = DataFileWatcher::new(&paths).unwrap();
    assert_eq!(watcher.dirs().len(), 2);
}

#[test]
fn watcher_tracks_config_and_data_files() {
    let root = tempfile::tempdir().unwrap();
    let paths = PathResolver::new(root.path().join("user"), root.path().join("install"), "chewing");
    let watcher = DataFileWatcher::new(&paths).unwrap();

    assert!(watcher.is_tracked(Path::new("/x/config.json")));
    assert!(watcher.is_tracked(Path::new("/x/symbols.dat")));
    assert!(watcher.is_tracked(Path::new("swkb.dat")));
    assert!(watcher.is_tracked(Path::new("/x/userphrase.dat")));
    assert!(!watcher.is_tracked(Path::new("/x/config.json.tmp")));
    assert!(!watcher.is_tracked(Path::new("/x/array30.cin")));
}

#[test]
fn watcher_without_any_dir_fails() {
    let root = tempfile::tempdir().unwrap();
    let blocker = root.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let paths = PathResolver::new(&blocker, root.path().join("install"), "chewing");

    let result = DataFileWatcher::new(&paths);
    assert!(matches!(result, Err(cinbase_common::ConfigError::WatchError(_))));
}

#[tokio::test]
async fn watch_returns_once_no_receiver_is_left() {
    let root = tempfile::tempdir().unwrap();
    let paths = PathResolver::new(root.path().join("user"), root.path().join("install"), "chewing");
    let config_dir = paths.config_dir().unwrap();
    let watcher = DataFileWatcher::new(&paths).unwrap();

    let (tx, rx) = broadcast::channel(4);
    drop(rx);

    let watching = tokio::spawn(async move { watcher.watch(tx).await });
    tokio::time::sleep(Duration::from_millis(200)).await;
    std::fs::write(config_dir.join("symbols.dat"), "x").unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), watching)
        .await
        .expect("watcher kept running without receivers")
        .unwrap();
    assert!(result.is_ok());
}
