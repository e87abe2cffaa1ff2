//! Tracing subscriber setup shared by both binaries.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::sanitize::SanitizingMakeWriter;
use crate::config::{LogConfig, LogTarget};

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered lines are flushed.
///
/// # Errors
/// Returns error if the log file cannot be opened.
pub fn init(config: &LogConfig) -> std::io::Result<WorkerGuard> {
    let (writer, guard) = match &config.target {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                // Best-effort: open() below reports the real failure.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_appender::non_blocking(file)
        }
        LogTarget::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    Ok(guard)
}
