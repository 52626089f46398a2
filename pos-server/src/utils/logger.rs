//! Logging Infrastructure
//!
//! Structured logging for development (pretty, stdout) and production
//! (optional JSON, daily rolling files).

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger with defaults (`info`, stdout)
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional file output
///
/// `RUST_LOG` takes precedence over `log_level` when set. Calling this more
/// than once is harmless: later calls are ignored.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "pos-server");
            let builder = builder.with_ansi(false).with_writer(file_appender);
            let _ = if json {
                builder.json().try_init()
            } else {
                builder.try_init()
            };
            return;
        }
        eprintln!("LOG_DIR {dir} does not exist, logging to stdout");
    }

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
