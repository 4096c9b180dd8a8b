//! Rule list backup for smscode-rules
//!
//! Exports the rule list to versioned `.scebak` files and imports them back,
//! either merging with or replacing the current rules.
//!
//! # Architecture
//!
//! - `BackupManager`: backup directory, file naming, listing, and the
//!   export/import entry points that resolve to an outcome tag
//! - `RuleExporter` / `RuleImporter`: the file format on each side
//! - `BackupTask`: runs one operation off the UI thread
//!
//! # Backup Format
//!
//! A JSON object with a `version` marker followed by the `rules` array; see
//! [`format`]. Only version 1 exists.
//!
//! # Example
//!
//! ```rust,ignore
//! use smscode_rules::backup::{BackupManager, ImportResult};
//!
//! let manager = BackupManager::from_settings(&settings, &paths);
//! let destination = manager.backup_dir().join(manager.default_backup_filename_today());
//! let rules = storage.rules.get_all()?;
//! BackupManager::export_rule_list(&destination, &rules);
//!
//! let result = BackupManager::import_rule_list(&destination, true, &storage);
//! assert_eq!(result, ImportResult::Success);
//! ```

mod exporter;
pub mod format;
mod importer;
mod manager;
mod outcome;
mod task;

pub use exporter::RuleExporter;
pub use importer::{parse_backup, read_backup, ImportError, ImportSummary, RuleImporter};
pub use manager::{
    is_valid_filename, BackupFileInfo, BackupManager, BACKUP_FILE_EXTENSION, BACKUP_FILE_PREFIX,
};
pub use outcome::{ExportResult, ImportResult};
pub use task::BackupTask;
