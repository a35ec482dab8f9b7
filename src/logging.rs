//! Logging setup: tracing to a non-blocking file writer.

use std::fs::File;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::LogConfig;

/// Handle to keep the logging worker thread alive
pub struct LogGuard {
    _guard: WorkerGuard,
}

/// Initialize logging. Returns `None` when no log file is configured.
pub fn init(config: &LogConfig) -> Result<Option<LogGuard>> {
    let Some(log_path) = &config.file else {
        return Ok(None);
    };

    // RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(config.parse_level()).into())
        .from_env_lossy();

    let file = File::create(log_path)
        .with_context(|| format!("Failed to create log file: {:?}", log_path))?;
    let (non_blocking, worker_guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!("Logging initialized at level: {}", config.parse_level());
    Ok(Some(LogGuard {
        _guard: worker_guard,
    }))
}
