use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// cinbase: inspect and maintain an input method's settings store.
#[derive(Parser, Debug)]
#[command(name = "cinbase", version, about)]
pub struct Args {
    /// Input method directory name (e.g. chewing, checj, chedayi).
    #[arg(long, default_value = "chewing")]
    pub ime: String,

    /// User root override (default: ~/PIME).
    #[arg(long)]
    pub user_root: Option<PathBuf>,

    /// Bundled install root override (default: $CINBASE_INSTALL_DIR or the
    /// executable's directory).
    #[arg(long)]
    pub install_root: Option<PathBuf>,

    /// Log filter directive (e.g. debug, cinbase_config=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print the current settings as JSON.
    Show,
    /// Write the current settings back to disk.
    Save,
    /// Print the version vector, tracked files, and validation result.
    Check,
    /// Print every version change until interrupted.
    Watch {
        /// Seconds between polls.
        #[arg(long, default_value_t = 3.0)]
        interval: f64,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
