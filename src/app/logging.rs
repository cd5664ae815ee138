use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use super::error::AppError;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set. Otherwise the crate logs at `info` (`debug`
/// with `verbose`). With `log_file` set, output is appended there without
/// ANSI colors; otherwise it goes to stderr.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("memc_load=debug,warn")
        } else {
            EnvFilter::new("memc_load=info,warn")
        }
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let installed = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| AppError::Logging(format!("{}: {}", path.display(), e)))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| AppError::Logging(e.to_string()))
}
