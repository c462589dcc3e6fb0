//! Live version monitoring.
//!
//! Combines the file watcher with periodic store updates so a consumer can
//! await version changes instead of calling `update()` itself.

mod monitor;


pub use monitor::{ReloadMonitor, VersionChange};
