//! Tests for version vectors and mtime observation.

use super::*;
use crate::paths::PathResolver;
use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::TempDir;

fn touch(path: &Path, secs: u64) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = File::options().create(true).append(true).open(path).unwrap();
    file.set_modified(UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

fn resolver(root: &TempDir) -> PathResolver {
    PathResolver::new(root.path().join("user"), root.path().join("install"), "chephonetic")
}

#[test]
fn array_round_trip_keeps_slot_order() {
    let v = VersionVector::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(v.config, 1.0);
    assert_eq!(v.symbols, 2.0);
    assert_eq!(v.easy_symbols, 3.0);
    assert_eq!(v.full_shape_symbols, 4.0);
    assert_eq!(v.language_list, 5.0);
    assert_eq!(v.user_phrase, 6.0);
    assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    assert_eq!(v.data_slots(), [2.0, 3.0, 4.0, 5.0, 6.0]);
}

#[test]
fn config_and_data_differences_are_independent() {
    let base = VersionVector::from_array([10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);

    let config_only = VersionVector { config: 11.0, ..base };
    assert!(base.config_differs(&config_only));
    assert!(!base.data_differs(&config_only));

    let symbols_only = VersionVector { symbols: 21.0, ..base };
    assert!(!base.config_differs(&symbols_only));
    assert!(base.data_differs(&symbols_only));

    let user_phrase_only = VersionVector { user_phrase: 0.0, ..base };
    assert!(base.data_differs(&user_phrase_only));
}

#[test]
fn data_file_names() {
    let names: Vec<_> = DataFile::ALL.iter().map(|f| f.file_name()).collect();
    assert_eq!(
        names,
        ["symbols.dat", "swkb.dat", "fsymbols.dat", "flangs.dat", "userphrase.dat"]
    );
}

#[test]
fn mtime_of_missing_file_is_zero() {
    assert_eq!(mtime_secs(Path::new("/tmp/nonexistent_cinbase_file.dat")), 0.0);
}

#[test]
fn mtime_reports_epoch_seconds() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("symbols.dat");
    touch(&path, 1_700_000_000);
    assert_eq!(mtime_secs(&path), 1_700_000_000.0);
}

#[test]
fn observe_with_nothing_on_disk_is_all_zero() {
    let root = TempDir::new().unwrap();
    let v = VersionVector::observe(&resolver(&root));
    assert_eq!(v, VersionVector::default());
}

#[test]
fn observe_reads_config_and_bundled_data() {
    let root = TempDir::new().unwrap();
    let paths = resolver(&root);
    touch(&paths.config_file_path().unwrap(), 1_000);
    touch(&paths.data_dir().join("symbols.dat"), 2_000);
    touch(&paths.data_dir().join("flangs.dat"), 3_000);

    let v = VersionVector::observe(&paths);
    assert_eq!(v.config, 1_000.0);
    assert_eq!(v.symbols, 2_000.0);
    assert_eq!(v.easy_symbols, 0.0);
    assert_eq!(v.language_list, 3_000.0);
    assert_eq!(v.data_file(DataFile::LanguageList), 3_000.0);
}

#[test]
fn observe_prefers_user_override_of_data_file() {
    let root = TempDir::new().unwrap();
    let paths = resolver(&root);
    touch(&paths.data_dir().join("swkb.dat"), 5_000);
    touch(&paths.config_dir().unwrap().join("swkb.dat"), 6_000);

    let v = VersionVector::observe(&paths);
    assert_eq!(v.easy_symbols, 6_000.0);
}

#[test]
fn observe_does_not_stat_bundled_file_for_config_slot() {
    let root = TempDir::new().unwrap();
    let paths = resolver(&root);
    touch(&paths.default_config_file(), 7_000);

    let v = VersionVector::observe(&paths);
    assert_eq!(v.config, 0.0);
}

#[test]
fn vector_serializes_named_slots() {
    let v = VersionVector::from_array([1.5, 0.0, 0.0, 0.0, 0.0, 2.0]);
    let json = serde_json::to_value(v).unwrap();
    assert_eq!(json["config"], 1.5);
    assert_eq!(json["user_phrase"], 2.0);
}

#[test]
fn recent_mtime_is_positive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("userphrase.dat");
    std::fs::write(&path, "x").unwrap();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs_f64();
    let mtime = mtime_secs(&path);
    assert!(mtime > 0.0 && mtime <= now + 1.0);
}
