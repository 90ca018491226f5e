use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with console output and, when a log
/// directory is given, daily-rotated JSON file output.
///
/// Returns the appender guard when file logging is enabled; the caller must
/// keep it alive so buffered log lines are flushed on exit. Opt-in: the
/// library never installs a subscriber unless this is called.
pub fn init(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env()
        .add_directive("xmlmap=debug".parse().expect("valid directive"));

    match log_dir {
        Some(dir) => {
            let _ = fs::create_dir_all(dir);

            let file_appender = tracing_appender::rolling::daily(dir, "xmlmap.log");
            let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer().json().with_writer(non_blocking_writer);
            let console_layer = fmt::layer().with_writer(std::io::stdout);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(console_layer)
                .init();

            Some(guard)
        }
        None => {
            let console_layer = fmt::layer().with_writer(std::io::stdout);

            tracing_subscriber::registry()
                .with(filter)
                .with(console_layer)
                .init();

            None
        }
    }
}
