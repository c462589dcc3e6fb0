//! The settings store: persistence plus throttled change detection.

mod config_store;


pub use config_store::{ConfigStore, StoreStats, UPDATE_THROTTLE_SECS};
