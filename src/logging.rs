//! Logging setup for Courier.
//!
//! Events always go to stdout. When `logging.file` is set, a second layer
//! writes the same events to that file without ANSI colours.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::Result;

/// Parse log level string to tracing Level.
fn parse_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// `RUST_LOG` directives plus the configured level.
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(parse_level(level).into())
}

/// Create (truncate) the log file, creating its directory first.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(File::create(path)?)
}

/// Install the global subscriber described by `config`.
///
/// Fails if the log file cannot be created; nothing is installed then.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let file_layer = match config.file.as_deref() {
        Some(path) => {
            let file = Arc::new(open_log_file(Path::new(path))?);
            Some(fmt::layer().with_writer(file).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    Ok(())
}

/// Install a stdout-only subscriber.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(fmt::layer().with_target(true))
        .init();
}
