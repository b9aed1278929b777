//! Logging setup: console on stderr plus an append-only log file.

use std::fs::OpenOptions;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the subscriber. Stdout is reserved for the MCP stdio
/// transport, so console output goes to stderr. Returns the file writer's
/// guard; hold it for the process lifetime so buffered lines are flushed.
pub fn init(log_path: impl AsRef<Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_ansi(false);

    match OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path.as_ref())
    {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            tracing::warn!(
                error = %e,
                path = %log_path.as_ref().display(),
                "could not open log file, logging to stderr only"
            );
            None
        }
    }
}
