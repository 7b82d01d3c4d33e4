//! Logging infrastructure.
//!
//! Structured logging with dual output:
//! - Writes to `logs/formfill.log` (cleared on session start)
//! - Also prints to stderr so progress output on stdout stays clean
//! - Configurable via the `RUST_LOG` environment variable

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Default log directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "formfill.log";

/// Initializes the logging system.
///
/// Creates the log directory if needed, clears the previous log file, and
/// sets up output to both the file and stderr. `RUST_LOG` controls the
/// filter; the default is `info`.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(log_dir: &str, log_file: &str) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;

    // Clear the previous session's file; handles both the existing and
    // missing cases.
    let log_path = Path::new(log_dir).join(log_file);
    fs::write(&log_path, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        assert_eq!(DEFAULT_LOG_DIR, "logs");
        assert_eq!(DEFAULT_LOG_FILE, "formfill.log");
    }

    #[test]
    fn test_log_file_is_cleared_on_init() {
        // init_logging installs a global subscriber, which can only happen
        // once per process; exercise the file handling on its own.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stale.log");
        fs::write(&path, "old session data").unwrap();

        fs::write(&path, "").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
