//! Path management for smscode-rules
//!
//! Provides XDG-compliant path resolution for configuration and data, and
//! resolves the user-visible backup directory.
//!
//! ## Path Resolution Order
//!
//! 1. `SMSCODE_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/smscode-rules` or `~/.config/smscode-rules`
//! 3. Windows: `%APPDATA%\smscode-rules`
//!
//! Backups live outside the data directory, in a `SmsCodeExtractor` folder
//! under the user's documents directory, so they can be copied off the
//! machine by hand.

use std::path::PathBuf;

use directories::UserDirs;

use crate::error::SmsCodeError;

/// Name of the backup folder under user-accessible storage
pub const BACKUP_DIRECTORY_NAME: &str = "SmsCodeExtractor";

/// Manages all paths used by smscode-rules
#[derive(Debug, Clone)]
pub struct SmsCodePaths {
    /// Base directory for all application data
    base_dir: PathBuf,
}

impl SmsCodePaths {
    /// Create a new SmsCodePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, SmsCodeError> {
        let base_dir = if let Ok(custom) = std::env::var("SMSCODE_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create SmsCodePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/smscode-rules/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/smscode-rules/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the log directory used while the TUI owns the terminal
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to rules.json
    pub fn rules_file(&self) -> PathBuf {
        self.data_dir().join("rules.json")
    }

    /// Ensure the base and data directories exist
    ///
    /// The backup directory is not created here; it is created by the
    /// first export that targets it.
    pub fn ensure_directories(&self) -> Result<(), SmsCodeError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SmsCodeError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| SmsCodeError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the application has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the well-known backup directory under user-accessible storage
///
/// Prefers the documents directory, then the home directory. Falls back to a
/// `backups` folder in the data directory when neither can be determined.
pub fn default_backup_dir(paths: &SmsCodePaths) -> PathBuf {
    match UserDirs::new() {
        Some(dirs) => dirs
            .document_dir()
            .map(|d| d.to_path_buf())
            .unwrap_or_else(|| dirs.home_dir().to_path_buf())
            .join(BACKUP_DIRECTORY_NAME),
        None => paths.base_dir().join("backups").join(BACKUP_DIRECTORY_NAME),
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, SmsCodeError> {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(config_home).join("smscode-rules"));
    }
    let home = std::env::var("HOME")
        .map_err(|_| SmsCodeError::Config("HOME environment variable not set".into()))?;
    Ok(PathBuf::from(home).join(".config").join("smscode-rules"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, SmsCodeError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| SmsCodeError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("smscode-rules"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SmsCodePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            paths.rules_file(),
            temp_dir.path().join("data").join("rules.json")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SmsCodePaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_default_backup_dir_name() {
        let temp_dir = TempDir::new().unwrap();
        let paths = SmsCodePaths::with_base_dir(temp_dir.path().to_path_buf());

        let dir = default_backup_dir(&paths);
        assert!(dir.ends_with(BACKUP_DIRECTORY_NAME));
        // Resolution never creates the directory
        assert!(!paths.base_dir().join("backups").exists());
    }
}
