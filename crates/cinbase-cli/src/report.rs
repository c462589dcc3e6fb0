//! Human-readable rendering of store state.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use cinbase_config::{
    find_first, validation, ConfigStore, DataFile, VersionChange, VersionVector,
};

/// Render an mtime slot, `-` for a missing file.
pub fn format_mtime(secs: f64) -> String {
    if secs <= 0.0 {
        return "-".into();
    }
    let whole = secs.trunc() as i64;
    let nanos = (secs.fract() * 1e9) as u32;
    DateTime::<Utc>::from_timestamp(whole, nanos)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string())
        .unwrap_or_else(|| format!("{secs}"))
}

/// Version vector, the file behind each slot, validation, and counters.
pub fn check_report(store: &ConfigStore) -> String {
    let paths = store.paths();
    let version = store.version();
    let mut out = String::new();

    let config_path = paths
        .config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|e| format!("<{e}>"));
    let _ = writeln!(out, "ime:        {}", paths.ime_dir_name());
    let _ = writeln!(out, "{:<16} {:<27} {}", "config.json", format_mtime(version.config), config_path);

    let search = paths.data_search_dirs();
    for file in DataFile::ALL {
        let found = find_first(&search, file.file_name())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not found)".into());
        let _ = writeln!(
            out,
            "{:<16} {:<27} {}",
            file.file_name(),
            format_mtime(version.data_file(file)),
            found
        );
    }

    match store.with_settings(validation::validate) {
        Ok(()) => out.push_str("settings:   valid\n"),
        Err(e) => {
            let _ = writeln!(out, "settings:   {e}");
        }
    }

    let stats = store.stats();
    let _ = writeln!(
        out,
        "activity:   {} stat passes, {} loads, {} saves",
        stats.stat_passes, stats.loads, stats.saves
    );
    out
}

/// One line describing a version change.
pub fn format_change(change: &VersionChange) -> String {
    let what = match (change.config_changed, change.full_reload_needed) {
        (true, true) => "settings and data files changed",
        (true, false) => "settings changed",
        (false, true) => "data files changed (full reload needed)",
        (false, false) => "no change",
    };
    let mut line = what.to_string();
    for (name, before, after) in changed_slots(&change.previous, &change.current) {
        let _ = write!(line, "; {name}: {} -> {}", format_mtime(before), format_mtime(after));
    }
    line
}

fn changed_slots(
    previous: &VersionVector,
    current: &VersionVector,
) -> Vec<(&'static str, f64, f64)> {
    let mut slots = Vec::new();
    if previous.config != current.config {
        slots.push(("config.json", previous.config, current.config));
    }
    for file in DataFile::ALL {
        let (before, after) = (previous.data_file(file), current.data_file(file));
        if before != after {
            slots.push((file.file_name(), before, after));
        }
    }
    slots
}
