use crate::types::LogLevel;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Install the global subscriber.
///
/// Logs go to stderr, or to `log_file` when given (the interactive browser
/// owns the terminal). `RUST_LOG` takes precedence over `level`.
pub fn init_logging(level: LogLevel, log_file: Option<&Path>) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // A subscriber installed earlier (tests) wins.
    if let Err(e) = installed {
        tracing::debug!("logging already initialised: {}", e);
    }
    Ok(())
}
