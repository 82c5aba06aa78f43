//! Logging setup
//!
//! Console output always; a per-array log file when a log directory is
//! configured. `RUST_LOG` overrides the configured level.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use chrono::{Local, NaiveDateTime};
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file name for an array run: `<ARRAY>_<YYYYmmddTHH>_read.log`
pub fn log_file_name(array_name: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_{}_read.log",
        array_name.to_uppercase(),
        timestamp.format("%Y%m%dT%H")
    )
}

/// Install the global tracing subscriber
///
/// Returns the log file path when file logging is enabled. Calling this a
/// second time in one process returns `Error::Config`.
pub fn init_logging(array_name: &str, config: &LoggingConfig) -> Result<Option<PathBuf>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let console_layer = fmt::layer().with_target(false);

    let (file_layer, log_path) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name(array_name, Local::now().naive_local()));
            let file = File::create(&path)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Logging already initialised: {}", e)))?;

    match &log_path {
        Some(path) => info!(array = array_name, path = %path.display(), "Logger initialised"),
        None => info!(array = array_name, "Logger initialised (console only)"),
    }

    Ok(log_path)
}
