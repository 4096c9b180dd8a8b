//! Backup manager for smscode-rules
//!
//! Owns the backup directory and file naming, lists existing backups, and
//! runs exports and imports. Every error inside an export or import is
//! logged here and collapsed into an outcome tag.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use tracing::{error, info};

use crate::config::paths::SmsCodePaths;
use crate::config::settings::Settings;
use crate::error::{SmsCodeError, SmsCodeResult};
use crate::models::Rule;
use crate::storage::Storage;

use super::exporter::RuleExporter;
use super::importer::{ImportSummary, RuleImporter};
use super::outcome::{ExportResult, ImportResult};

/// Extension every backup file carries
pub const BACKUP_FILE_EXTENSION: &str = ".scebak";

/// Prefix of generated backup file names
pub const BACKUP_FILE_PREFIX: &str = "bak-";

/// Longest file name accepted for a backup
const MAX_FILENAME_LEN: usize = 255;

/// A backup file found in the backup directory
#[derive(Debug, Clone)]
pub struct BackupFileInfo {
    /// File name including extension
    pub filename: String,
    /// Full path to the file
    pub path: PathBuf,
    /// Size in bytes
    pub size_bytes: u64,
    /// Last modification time, when the platform reports one
    pub modified: Option<DateTime<Local>>,
}

/// Manages backup naming, listing, export and import
#[derive(Debug, Clone)]
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    /// Create a manager for an explicit backup directory
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    /// Create a manager for the configured backup directory
    pub fn from_settings(settings: &Settings, paths: &SmsCodePaths) -> Self {
        Self::new(settings.resolve_backup_dir(paths))
    }

    /// Backup directory; not created until something is exported into it
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Default name for a backup taken on `date`
    ///
    /// `bak-<date>.scebak`, or `bak-<date>-<n>.scebak` with the smallest
    /// `n >= 2` that is not already present in the backup directory.
    pub fn default_backup_filename(&self, date: NaiveDate) -> String {
        let basename = format!("{}{}", BACKUP_FILE_PREFIX, date.format("%Y-%m-%d"));

        let mut filename = format!("{}{}", basename, BACKUP_FILE_EXTENSION);
        let mut n = 2;
        while self.backup_dir.join(&filename).exists() {
            filename = format!("{}-{}{}", basename, n, BACKUP_FILE_EXTENSION);
            n += 1;
        }
        filename
    }

    /// Default name for a backup taken today (local date)
    pub fn default_backup_filename_today(&self) -> String {
        self.default_backup_filename(Local::now().date_naive())
    }

    /// Path for a file name or path given by the user
    ///
    /// Bare names resolve inside the backup directory; anything with a
    /// directory component is used as given.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.components().count() > 1 || path.is_absolute() {
            path.to_path_buf()
        } else {
            self.backup_dir.join(name)
        }
    }

    /// List backup files sorted by file name, ascending
    ///
    /// A missing backup directory yields an empty list.
    pub fn list_backup_files(&self) -> SmsCodeResult<Vec<BackupFileInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            SmsCodeError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                SmsCodeError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            let filename = entry.file_name().to_string_lossy().into_owned();
            if !filename.ends_with(BACKUP_FILE_EXTENSION) {
                continue;
            }

            // Follows symlinks, so a linked backup is listed like a plain file
            let metadata = match fs::metadata(entry.path()) {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };

            backups.push(BackupFileInfo {
                path: entry.path(),
                size_bytes: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Local>::from),
                filename,
            });
        }

        backups.sort_by(|a, b| a.filename.cmp(&b.filename));

        Ok(backups)
    }

    /// Most recently written backup file
    pub fn latest_backup(&self) -> SmsCodeResult<Option<BackupFileInfo>> {
        let backups = self.list_backup_files()?;
        Ok(backups
            .into_iter()
            .max_by(|a, b| a.modified.cmp(&b.modified).then(a.filename.cmp(&b.filename))))
    }

    /// Export `rules` to `destination`
    pub fn export_rule_list(destination: &Path, rules: &[Rule]) -> ExportResult {
        match RuleExporter::new(rules).export_to(destination) {
            Ok(()) => {
                info!(
                    path = %destination.display(),
                    count = rules.len(),
                    "rule list exported"
                );
                ExportResult::Success
            }
            Err(e) => {
                error!(path = %destination.display(), error = %e, "export rule list failed");
                ExportResult::Failed
            }
        }
    }

    /// Import rules from `source`, merging when `retain` is set and
    /// replacing the stored list otherwise
    pub fn import_rule_list(source: &Path, retain: bool, storage: &Storage) -> ImportResult {
        match Self::import_with_summary(source, retain, storage) {
            Ok(_) => ImportResult::Success,
            Err(result) => result,
        }
    }

    /// Like [`Self::import_rule_list`], returning what changed on success
    pub fn import_with_summary(
        source: &Path,
        retain: bool,
        storage: &Storage,
    ) -> Result<ImportSummary, ImportResult> {
        match RuleImporter::new(storage).import_from(source, retain) {
            Ok(summary) => {
                info!(
                    path = %source.display(),
                    retain,
                    added = summary.added,
                    skipped = summary.skipped,
                    "rule list imported"
                );
                Ok(summary)
            }
            Err(e) => {
                let result = ImportResult::from(&e);
                error!(
                    path = %source.display(),
                    outcome = ?result,
                    error = %e,
                    "import rule list failed"
                );
                Err(result)
            }
        }
    }
}

/// Whether `name` can be used as a backup file name
///
/// Rejects empty names, path separators, names made only of dots, control
/// characters and characters reserved on common filesystems.
pub fn is_valid_filename(name: &str) -> bool {
    const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

    let trimmed = name.trim();
    !trimmed.is_empty()
        && trimmed == name
        && name.len() <= MAX_FILENAME_LEN
        && !name.chars().all(|c| c == '.')
        && !name.chars().any(|c| c.is_control() || RESERVED.contains(&c))
}
