//! File watcher for the settings and data files.
//!
//! Uses the `notify` crate with a 500ms debounce so an editor's
//! write-then-rename save produces a single signal.

mod data_watcher;

#[cfg(test)]
mod tests;

pub use data_watcher::DataFileWatcher;
