use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::ParseError, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::AppError;

/// Log file name inside the data directory. Rotated daily.
pub const LOG_FILE: &str = "todo.log";

/// Filter from `RUST_LOG` if set, otherwise from `fallback` directives.
pub fn env_filter(fallback: &str) -> Result<EnvFilter, ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback),
    }
}

/// Install the global subscriber: non-blocking file output in `log_dir`,
/// plus stderr when `verbose` is set.
///
/// The returned guard flushes the file writer on drop and must be kept for
/// the lifetime of the process.
pub fn init(log_dir: &Path, directives: &str, verbose: bool) -> Result<WorkerGuard, AppError> {
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking);

    let console_layer = verbose.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter(directives)?)
        .with(file_layer)
        .with(console_layer)
        .with(tracing_error::ErrorLayer::default())
        .try_init()?;

    Ok(guard)
}
