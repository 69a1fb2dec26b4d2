//! Logging Infrastructure
//!
//! Structured logging setup for development (pretty console) and production
//! (JSON console), with an optional daily-rotated file sink.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

const DEFAULT_DIRECTIVES: &str = "tower_http=info,sqlx=warn";

/// Initialize the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `log_level` applies to this crate.
/// The returned guard flushes the file writer and must be held for the
/// lifetime of the process.
pub fn init_logger(
    log_level: &str,
    json: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "symposium_server={log_level},shared={log_level},{DEFAULT_DIRECTIVES}"
        ))
    })?;

    let console = if json {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer()
            .pretty()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_target(false)
            .boxed()
    };

    let (file, guard) = match log_dir {
        Some(dir) => {
            let log_path = Path::new(dir);
            std::fs::create_dir_all(log_path)?;
            let file_appender = tracing_appender::rolling::daily(log_path, "symposium-server");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()?;

    Ok(guard)
}
