//! JSON settings file loading.

mod loader;


pub use loader::{merge_document, merge_from_path, read_document, select_source, MergeReport};
