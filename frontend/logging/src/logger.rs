//! Structured Logger
//!
//! Wraps `tracing` to provide JSON-formatted file output with daily rotation
//! (NDJSON) and environment-based level control.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Keeps the background log writer alive; flushes on drop.
pub struct LogGuard {
    _file: WorkerGuard,
}

/// Initialize the global structured logger.
///
/// Always writes NDJSON to `cardcheck.log.YYYY-MM-DD` under `log_dir`. The
/// console layer goes to stderr and is skipped when `console` is false, which
/// the terminal UI needs so log lines don't land on its screen.
pub fn init_logger<P: AsRef<Path>>(log_dir: P, level: &str, console: bool) -> Result<LogGuard> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "cardcheck.log");
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_ansi(false);

    let console_layer = console.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
            .boxed()
    });

    // A second init (tests, repeated CLI calls) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    Ok(LogGuard { _file: file_guard })
}
