//! Logging setup.
//!
//! The library only emits `tracing` events; binaries call [`init`] once to
//! install a subscriber. `RUST_LOG` overrides the configured level.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{BuildError, BuildResult};

/// Keeps the file writer alive. Hold it until the program exits so buffered
/// log lines are flushed.
#[derive(Debug)]
pub struct LoggingGuard {
    _worker: Option<WorkerGuard>,
}

/// Build the level filter: `RUST_LOG` when set, else `level`.
pub fn env_filter(level: &str) -> BuildResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| BuildError::Config(format!("invalid log level '{}': {}", level, e)))
}

/// Install the global subscriber.
///
/// Logs go to stderr, or to `log_file` (no ANSI colors) when one is given.
pub fn init(level: &str, log_file: Option<&Path>) -> BuildResult<LoggingGuard> {
    let filter = env_filter(level)?;

    let Some(path) = log_file else {
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .map_err(|e| BuildError::Config(format!("failed to initialize logging: {}", e)))?;
        return Ok(LoggingGuard { _worker: None });
    };

    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| BuildError::Config(format!("log file has no name: {}", path.display())))?;

    std::fs::create_dir_all(directory).map_err(|e| BuildError::read_failed(directory, e))?;
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| BuildError::Config(format!("failed to initialize logging: {}", e)))?;

    Ok(LoggingGuard {
        _worker: Some(guard),
    })
}
