//! Outcome tags for backup operations
//!
//! Every export or import resolves to exactly one of these. No lower-level
//! error detail crosses the backup boundary; callers map a tag to a message.

use std::fmt;

/// Result of exporting the rule list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportResult {
    Success,
    Failed,
}

impl ExportResult {
    /// Whether the export completed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// User-facing message for this outcome
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Rules exported",
            Self::Failed => "Export failed",
        }
    }
}

impl fmt::Display for ExportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of importing a rule list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportResult {
    Success,
    /// The file carries no version marker
    VersionMissed,
    /// The version marker is not one this build understands
    VersionUnknown,
    /// The rule data is malformed
    BackupInvalid,
    /// The file could not be read, or the rules could not be stored
    ReadFailed,
}

impl ImportResult {
    /// Whether the import completed
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// User-facing message for this outcome
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Rules imported",
            Self::VersionMissed => "Import failed: backup version is missing",
            Self::VersionUnknown => "Import failed: backup version is not supported",
            Self::BackupInvalid => "Import failed: backup file is invalid",
            Self::ReadFailed => "Import failed: backup file could not be read",
        }
    }
}

impl fmt::Display for ImportResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
