//! Config and data file lookup across the user and bundled directories.

mod resolve;


pub use resolve::{find_first, PathResolver, CONFIG_FILE_NAME, INSTALL_DIR_ENV};
