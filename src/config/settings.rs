//! User settings for smscode-rules
//!
//! Manages user preferences: where backups go, how long a removed rule can
//! be restored, and the default log level.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::{default_backup_dir, SmsCodePaths};
use crate::error::SmsCodeError;

/// User settings for smscode-rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Override for the backup directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,

    /// Seconds a removed rule stays restorable before the removal is committed
    #[serde(default = "default_undo_window_secs")]
    pub undo_window_secs: u64,

    /// Default tracing level when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether `init` has been run
    #[serde(default)]
    pub setup_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_undo_window_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup_dir: None,
            undo_window_secs: default_undo_window_secs(),
            log_level: default_log_level(),
            setup_completed: false,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &SmsCodePaths) -> Result<Self, SmsCodeError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| SmsCodeError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                SmsCodeError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &SmsCodePaths) -> Result<(), SmsCodeError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| SmsCodeError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| SmsCodeError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Backup directory, honouring the override
    pub fn resolve_backup_dir(&self, paths: &SmsCodePaths) -> PathBuf {
        self.backup_dir
            .clone()
            .unwrap_or_else(|| default_backup_dir(paths))
    }

    /// Undo window as a [`std::time::Duration`]
    pub fn undo_window(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.undo_window_secs)
    }
}
