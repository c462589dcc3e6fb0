//! File modification-time versioning.
//!
//! A [`VersionVector`] summarizes the on-disk state of the settings file
//! and the five data files. Comparing two vectors tells a caller whether
//! only settings need re-reading or whether resources built from the data
//! files must be rebuilt.

mod vector;

#[cfg(test)]
mod tests;

pub use vector::{mtime_secs, DataFile, VersionVector};
