//! Diagnostic logging
//!
//! Command-line runs log to stderr. The TUI owns the terminal, so it logs to
//! `logs/smscode.log` under the data directory instead. `RUST_LOG` overrides
//! the configured level in both cases.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{SmsCodeError, SmsCodeResult};

/// File name of the TUI log
pub const LOG_FILE_NAME: &str = "smscode.log";

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install a subscriber that writes to stderr
///
/// Calling it again after a subscriber is installed is a no-op.
pub fn init_logging(level: &str) {
    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Install a subscriber that appends to the log file in `log_dir`
pub fn init_file_logging(log_dir: &Path, level: &str) -> SmsCodeResult<()> {
    fs::create_dir_all(log_dir)
        .map_err(|e| SmsCodeError::Io(format!("Failed to create log directory: {}", e)))?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE_NAME))
        .map_err(|e| SmsCodeError::Io(format!("Failed to open log file: {}", e)))?;

    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_logging_creates_log_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("logs");

        init_file_logging(&log_dir, "debug").unwrap();
        assert!(log_dir.join(LOG_FILE_NAME).exists());

        init_logging("info");
    }
}
