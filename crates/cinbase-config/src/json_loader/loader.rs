//! Core JSON settings loading: pick the source file, parse, merge.

use std::path::{Path, PathBuf};

use cinbase_common::ConfigError;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::schema::SettingsRecord;
use crate::validation;

/// Outcome of merging a document into a settings record.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Known keys whose values were applied.
    pub applied: Vec<String>,
    /// Known keys whose values had the wrong shape and were left alone.
    pub rejected: Vec<String>,
    /// Keys the schema does not know.
    pub unknown: Vec<String>,
}

/// Choose which file to read settings from.
///
/// The user file wins unless it is missing or empty, in which case the
/// bundled default is used.
pub fn select_source(user_file: &Path, default_file: &Path) -> PathBuf {
    match std::fs::metadata(user_file) {
        Ok(meta) if meta.len() > 0 => user_file.to_path_buf(),
        _ => {
            debug!(
                "user config {} missing or empty, using {}",
                user_file.display(),
                default_file.display()
            );
            default_file.to_path_buf()
        }
    }
}

/// Read a settings document and return its top-level object.
pub fn read_document(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound(path.to_path_buf())
        } else {
            ConfigError::io(path, e)
        }
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| {
        ConfigError::ParseError(format!("failed to parse {}: {e}", path.display()))
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(ConfigError::ParseError(format!(
            "{} must contain a JSON object, found {}",
            path.display(),
            json_kind(&other)
        ))),
    }
}

/// Merge every known key of `document` into `settings`.
///
/// Keys missing from the document keep their current values. A known key
/// whose value does not fit the schema is skipped on its own; the rest of
/// the document still applies.
pub fn merge_document(
    settings: &mut SettingsRecord,
    document: &Map<String, Value>,
) -> Result<MergeReport, ConfigError> {
    let mut merged = match serde_json::to_value(&*settings) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return Err(ConfigError::ParseError(
                "settings did not serialize to an object".into(),
            ))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "failed to serialize settings: {e}"
            )))
        }
    };

    let mut report = MergeReport::default();
    for (key, value) in document {
        if !merged.contains_key(key) {
            report.unknown.push(key.clone());
            continue;
        }

        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value.clone());
        match serde_json::from_value::<SettingsRecord>(Value::Object(candidate)) {
            Ok(_) => {
                merged.insert(key.clone(), value.clone());
                report.applied.push(key.clone());
            }
            Err(e) => {
                warn!("ignoring config key '{key}': {e}");
                report.rejected.push(key.clone());
            }
        }
    }

    *settings = serde_json::from_value(Value::Object(merged))
        .map_err(|e| ConfigError::ParseError(format!("failed to apply settings: {e}")))?;

    if !report.unknown.is_empty() {
        debug!("ignored unknown config keys: {}", report.unknown.join(", "));
    }
    Ok(report)
}

/// Read `path` and merge it into `settings`.
///
/// After merging, the settings are validated; if validation fails, a
/// warning is logged and the merged values are kept as-is.
pub fn merge_from_path(
    settings: &mut SettingsRecord,
    path: &Path,
) -> Result<MergeReport, ConfigError> {
    let document = read_document(path)?;
    let report = merge_document(settings, &document)?;

    if let Err(e) = validation::validate(settings) {
        warn!("config validation warning: {e}; keeping loaded values");
    }

    info!(
        "loaded config from {} ({} keys applied)",
        path.display(),
        report.applied.len()
    );
    Ok(report)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
