pub mod errors;

pub use errors::{CinbaseError, ConfigError, PathError};

pub type Result<T> = std::result::Result<T, CinbaseError>;
