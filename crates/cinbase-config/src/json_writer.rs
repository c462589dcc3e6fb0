//! Write a SettingsRecord to JSON on disk.
//!
//! Uses atomic writes (write to `.tmp`, then rename) so a crash mid-write
//! never leaves a truncated settings file behind.

use std::path::Path;

use cinbase_common::ConfigError;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::schema::SettingsRecord;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Render settings as a four-space indented JSON document.
///
/// Keys appear in schema declaration order, so repeated saves of equal
/// settings produce byte-identical files.
pub fn settings_to_json(settings: &SettingsRecord) -> Result<String, ConfigError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    settings
        .serialize(&mut serializer)
        .map_err(|e| ConfigError::ParseError(format!("failed to serialize settings: {e}")))?;
    buf.push(b'\n');

    String::from_utf8(buf)
        .map_err(|e| ConfigError::ParseError(format!("serialized settings are not UTF-8: {e}")))
}

/// Write settings to `path`, overwriting it.
///
/// Creates parent directories if they don't exist.
pub fn save_to_path(settings: &SettingsRecord, path: &Path) -> Result<(), ConfigError> {
    let json = settings_to_json(settings)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json).map_err(|e| ConfigError::io(&tmp_path, e))?;

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        // Rename can fail on Windows if the target is held open
        tracing::warn!("atomic rename failed ({e}), falling back to direct write");
        let _ = std::fs::remove_file(&tmp_path);
        std::fs::write(path, &json).map_err(|e2| ConfigError::io(path, e2))?;
    }

    tracing::debug!(path = %path.display(), "settings saved to disk");
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_writes_valid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        save_to_path(&SettingsRecord::default(), &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: SettingsRecord = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, SettingsRecord::default());
    }

    #[test]
    fn document_uses_four_space_indent() {
        let json = settings_to_json(&SettingsRecord::default()).unwrap();
        assert!(json.starts_with("{\n    \"imeDirName\": \"\",\n    \"candPerRow\": 3,"));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn document_is_stable_across_saves() {
        let settings = SettingsRecord {
            cin_file_list: vec!["array30.cin".into()],
            ..SettingsRecord::for_ime("chedayi")
        };
        assert_eq!(
            settings_to_json(&settings).unwrap(),
            settings_to_json(&settings.clone()).unwrap()
        );
    }

    #[test]
    fn save_round_trip_preserves_every_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let settings = SettingsRecord {
            cand_per_row: 5,
            font_size: 22,
            output_simp_chinese: true,
            sel_cin_file: "cj.cin".into(),
            cin_file_list: vec!["cj.cin".into(), "array30.cin".into()],
            keyboard_type: 2,
            ..SettingsRecord::for_ime("checj")
        };
        save_to_path(&settings, &path).unwrap();

        let parsed: SettingsRecord =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("PIME").join("chewing").join("config.json");

        save_to_path(&SettingsRecord::default(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn save_cleans_up_tmp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        save_to_path(&SettingsRecord::default(), &path).unwrap();

        let tmp_path = path.with_extension("json.tmp");
        assert!(!tmp_path.exists(), "tmp file should be gone after rename");
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "garbage that is much longer than nothing").unwrap();

        save_to_path(&SettingsRecord::default(), &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("garbage"));
    }

    #[test]
    fn save_into_a_file_parent_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = save_to_path(&SettingsRecord::default(), &blocker.join("config.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
