mod cli;
mod report;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use cinbase_common::CinbaseError;
use cinbase_config::{settings_to_json, ConfigStore, PathResolver, ReloadMonitor};
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

fn main() -> ExitCode {
    let args = cli::parse();

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or("cinbase=info");
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "cinbase=info".parse().expect("static directive")),
            ),
        )
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CinbaseError> {
    let paths = resolve_paths(&args)?;
    tracing::debug!(
        user_root = %paths.user_root().display(),
        install_root = %paths.install_root().display(),
        "resolved paths"
    );
    let store = Arc::new(ConfigStore::open(paths));

    match args.command {
        Command::Show => {
            println!("{}", settings_to_json(&store.settings())?.trim_end());
        }
        Command::Save => {
            let before = store.stats().saves;
            store.save();
            if store.stats().saves == before {
                return Err(CinbaseError::Other(
                    "settings could not be written, see the log for details".into(),
                ));
            }
        }
        Command::Check => {
            print!("{}", report::check_report(&store));
        }
        Command::Watch { interval } => watch(store, interval)?,
    }
    Ok(())
}

fn resolve_paths(args: &Args) -> Result<PathResolver, CinbaseError> {
    if let (Some(user_root), Some(install_root)) = (&args.user_root, &args.install_root) {
        return Ok(PathResolver::new(user_root, install_root, &args.ime));
    }

    let platform = PathResolver::for_ime(&args.ime)?;
    Ok(PathResolver::new(
        args.user_root
            .clone()
            .unwrap_or_else(|| platform.user_root().to_path_buf()),
        args.install_root
            .clone()
            .unwrap_or_else(|| platform.install_root().to_path_buf()),
        &args.ime,
    ))
}

fn watch(store: Arc<ConfigStore>, interval: f64) -> Result<(), CinbaseError> {
    if !(interval.is_finite() && interval > 0.0) {
        return Err(CinbaseError::Other(format!(
            "watch interval must be a positive number of seconds, got {interval}"
        )));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let (initial, mut rx) =
            ReloadMonitor::start(store, Duration::from_secs_f64(interval)).await;
        println!("watching (config version {})", report::format_mtime(initial.config));

        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        tracing::warn!("reload monitor stopped");
                        break;
                    }
                    let change = *rx.borrow_and_update();
                    println!("{}", report::format_change(&change));
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted, stopping");
                    break;
                }
            }
        }
    });
    Ok(())
}
