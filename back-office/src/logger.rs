//! Logging Infrastructure
//!
//! `RUST_LOG` filter with a console layer, plus a daily rolling file when a
//! log directory is configured.

use std::path::Path;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "back_office=info,tower_http=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into())
}

/// Initialize the logger
///
/// Returns the file writer guard; dropping it flushes and stops the file writer,
/// so callers keep it alive for the life of the process.
pub fn init_logger(log_dir: Option<&str>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists() {
            let file_appender = tracing_appender::rolling::daily(log_path, "back-office");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let file = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            tracing_subscriber::registry()
                .with(env_filter())
                .with(console)
                .with(file)
                .init();
            return Some(guard);
        }
        eprintln!("LOG_DIR {dir} does not exist, logging to stdout only");
    }

    tracing_subscriber::registry()
        .with(env_filter())
        .with(console)
        .init();
    None
}
