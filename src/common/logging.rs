//! Logging and tracing configuration
//!
//! Diagnostics go to stderr so that the console report on stdout stays
//! readable. An optional log file receives full-detail output.

use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default stderr filter when `RUST_LOG` is unset
const STDERR_FILTER: &str = "conformance=info,warn";

/// Filter for the log file; debug for this crate regardless of `RUST_LOG`
const FILE_FILTER: &str = "conformance=debug,info";

/// Initialize tracing for the CLI (stderr logging)
///
/// Stderr is controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate, WARN for dependencies.
///
/// When `log_file` is given, a second layer with its own DEBUG-level
/// filter writes to it through a non-blocking writer. The returned guard
/// must be held until exit so buffered lines are flushed.
pub fn init_cli(log_file: Option<&Path>) -> Option<WorkerGuard> {
    let stderr_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(STDERR_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .with_filter(stderr_filter);

    let (file_layer, guard) = match log_file.map(open_log_file) {
        Some(Ok((writer, guard))) => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(EnvFilter::new(FILE_FILTER));
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Warning: Could not open log file: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Open `path` for appending behind a non-blocking writer
fn open_log_file(path: &Path) -> std::result::Result<(NonBlocking, WorkerGuard), String> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| format!("invalid log file path '{}'", path.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(|e| e.to_string())?;

    Ok(tracing_appender::non_blocking(appender))
}
