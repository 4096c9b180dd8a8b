//! Reads a backup file and applies its rules to storage

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::audit::AuditEntry;
use crate::error::SmsCodeError;
use crate::models::{Rule, RuleContent};
use crate::storage::Storage;

use super::format::{RuleRecord, RULES_KEY, SUPPORTED_VERSIONS, VERSION_KEY};
use super::outcome::ImportResult;

/// Why an import stopped
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read backup: {0}")]
    Read(#[from] std::io::Error),

    #[error("backup has no version marker")]
    VersionMissed,

    #[error("unsupported backup version: {0}")]
    VersionUnknown(String),

    #[error("invalid backup content: {0}")]
    Invalid(String),

    #[error("failed to store imported rules: {0}")]
    Storage(#[from] SmsCodeError),
}

impl From<&ImportError> for ImportResult {
    fn from(err: &ImportError) -> Self {
        match err {
            ImportError::Read(_) | ImportError::Storage(_) => ImportResult::ReadFailed,
            ImportError::VersionMissed => ImportResult::VersionMissed,
            ImportError::VersionUnknown(_) => ImportResult::VersionUnknown,
            ImportError::Invalid(_) => ImportResult::BackupInvalid,
        }
    }
}

/// What an applied import changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    /// Rules added to the list
    pub added: usize,
    /// Imported rules skipped as duplicates
    pub skipped: usize,
    /// Rules that were dropped because the list was replaced
    pub replaced: usize,
}

impl ImportSummary {
    pub fn describe(&self, retain: bool) -> String {
        if retain {
            format!("{} added, {} skipped (retain)", self.added, self.skipped)
        } else {
            format!("{} added, {} replaced", self.added, self.replaced)
        }
    }
}

/// Parses backups and merges or replaces the stored rule list
pub struct RuleImporter<'a> {
    storage: &'a Storage,
}

impl<'a> RuleImporter<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Read and apply a backup file
    pub fn import_from(&self, source: &Path, retain: bool) -> Result<ImportSummary, ImportError> {
        let rules = read_backup(source)?;
        let summary = self.apply(rules, retain)?;

        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        let entry = AuditEntry::backup_imported(name, summary.describe(retain));
        if let Err(e) = self.storage.audit().log(&entry) {
            warn!(error = %e, "failed to record import in audit log");
        }

        Ok(summary)
    }

    /// Apply parsed rules to storage
    ///
    /// With `retain`, imported rules are appended after the existing ones,
    /// skipping any whose content equals an existing rule or an earlier
    /// imported rule. Without it, the list becomes exactly the imported rules.
    /// If saving fails the stored list is put back as it was.
    pub fn apply(&self, imported: Vec<Rule>, retain: bool) -> Result<ImportSummary, SmsCodeError> {
        let previous = self.storage.rules.get_all()?;
        let mut summary = ImportSummary::default();

        let next = if retain {
            let mut seen: HashSet<RuleContent> = previous.iter().map(Rule::content).collect();
            let mut merged = previous.clone();
            for rule in imported {
                if seen.insert(rule.content()) {
                    merged.push(rule);
                    summary.added += 1;
                } else {
                    summary.skipped += 1;
                }
            }
            merged
        } else {
            summary.added = imported.len();
            summary.replaced = previous.len();
            imported
        };

        self.storage.rules.replace_all(next)?;
        if let Err(e) = self.storage.rules.save() {
            self.storage.rules.replace_all(previous)?;
            return Err(e);
        }

        Ok(summary)
    }
}

/// Read a backup file into fresh rules
pub fn read_backup(source: &Path) -> Result<Vec<Rule>, ImportError> {
    let mut contents = Vec::new();
    BufReader::new(File::open(source)?).read_to_end(&mut contents)?;
    parse_backup(contents)
}

/// Parse backup content into fresh rules
///
/// Content that is not UTF-8 JSON is invalid, not a read failure. Keys are
/// looked up by name, so the document's key order does not matter, but the
/// version marker is checked before any rule data is looked at.
pub fn parse_backup(contents: impl AsRef<[u8]>) -> Result<Vec<Rule>, ImportError> {
    let document: Value = serde_json::from_slice(contents.as_ref())
        .map_err(|e| ImportError::Invalid(format!("not valid JSON: {}", e)))?;

    let object = document.as_object().ok_or(ImportError::VersionMissed)?;
    let version = object.get(VERSION_KEY).ok_or(ImportError::VersionMissed)?;

    match version.as_u64() {
        Some(v) if SUPPORTED_VERSIONS.contains(&v) => {}
        _ => return Err(ImportError::VersionUnknown(version.to_string())),
    }

    let rules = object
        .get(RULES_KEY)
        .ok_or_else(|| ImportError::Invalid("missing rule list".into()))?;
    let records: Vec<RuleRecord> = serde_json::from_value(rules.clone())
        .map_err(|e| ImportError::Invalid(format!("malformed rule list: {}", e)))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| -> Result<Rule, ImportError> {
            let rule = record.into_rule();
            rule.validate()
                .map_err(|e| ImportError::Invalid(format!("rule {}: {}", index + 1, e)))?;
            Ok(rule)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::SmsCodePaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = SmsCodePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn result_of(contents: &str) -> ImportResult {
        match parse_backup(contents) {
            Ok(_) => ImportResult::Success,
            Err(e) => ImportResult::from(&e),
        }
    }

    #[test]
    fn test_parse_valid_backup() {
        let rules = parse_backup(
            r#"{"version":1,"rules":[
                {"company":"Acme","keyword":"code","regex":"\\d{6}"},
                {"company":"Bank","keyword":"otp","regex":"(\\d{4})","enabled":false}
            ]}"#,
        )
        .unwrap();

        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].company, "Acme");
        assert!(!rules[1].enabled);
    }

    #[test]
    fn test_failure_classification() {
        assert_eq!(result_of(r#"{"rules":[]}"#), ImportResult::VersionMissed);
        assert_eq!(result_of(r#"[1, 2]"#), ImportResult::VersionMissed);
        assert_eq!(result_of(r#"{"version":7,"rules":[]}"#), ImportResult::VersionUnknown);
        assert_eq!(result_of(r#"{"version":"1","rules":[]}"#), ImportResult::VersionUnknown);
        assert_eq!(result_of(r#"{"version":1}"#), ImportResult::BackupInvalid);
        assert_eq!(result_of(r#"{"version":1,"rules":{}}"#), ImportResult::BackupInvalid);
        assert_eq!(
            result_of(r#"{"version":1,"rules":[{"company":"A"}]}"#),
            ImportResult::BackupInvalid
        );
        assert_eq!(result_of("not json at all"), ImportResult::BackupInvalid);
    }

    #[test]
    fn test_version_checked_before_rules() {
        assert_eq!(
            result_of(r#"{"version":9,"rules":"garbage"}"#),
            ImportResult::VersionUnknown
        );
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let rules = parse_backup(
            r#"{"rules":[{"company":"Acme","keyword":"code","regex":"\\d{6}"}],"version":1}"#,
        )
        .unwrap();
        assert_eq!(rules.len(), 1);

        assert_eq!(
            result_of(r#"{"rules":[{"company":"A"}],"version":1}"#),
            ImportResult::BackupInvalid
        );
        assert_eq!(
            result_of(r#"{"rules":"garbage","version":2}"#),
            ImportResult::VersionUnknown
        );
    }

    #[test]
    fn test_long_regex_imports() {
        let regex = format!("code (\\\\d{{6}})|{}", "y".repeat(250));
        let contents = format!(
            r#"{{"version":1,"rules":[{{"company":"Acme","keyword":"code","regex":"{}"}}]}}"#,
            regex
        );

        let rules = parse_backup(contents).unwrap();
        assert_eq!(rules[0].code_regex.len(), 263);
    }

    #[test]
    fn test_non_utf8_content_is_invalid_backup() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("binary.scebak");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        let err = read_backup(&path).unwrap_err();
        assert_eq!(ImportResult::from(&err), ImportResult::BackupInvalid);
    }

    #[test]
    fn test_invalid_regex_is_invalid_backup() {
        assert_eq!(
            result_of(r#"{"version":1,"rules":[{"company":"A","keyword":"k","regex":"(\\d"}]}"#),
            ImportResult::BackupInvalid
        );
    }

    #[test]
    fn test_missing_file_is_read_failure() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_backup(&temp_dir.path().join("missing.scebak")).unwrap_err();
        assert_eq!(ImportResult::from(&err), ImportResult::ReadFailed);
    }

    #[test]
    fn test_apply_retain_skips_duplicates() {
        let (_temp_dir, storage) = create_test_storage();
        storage.rules.insert(Rule::new("Acme", "code", r"\d{6}")).unwrap();

        let imported = vec![
            Rule::new("Acme", "code", r"\d{6}"),
            Rule::new("Bank", "otp", r"\d{4}"),
            Rule::new("Bank", "otp", r"\d{4}"),
        ];
        let summary = RuleImporter::new(&storage).apply(imported, true).unwrap();

        assert_eq!(summary.added, 1);
        assert_eq!(summary.skipped, 2);
        let companies: Vec<_> = storage
            .rules
            .get_all()
            .unwrap()
            .into_iter()
            .map(|r| r.company)
            .collect();
        assert_eq!(companies, vec!["Acme", "Bank"]);
    }

    #[test]
    fn test_apply_replace_keeps_imported_as_is() {
        let (_temp_dir, storage) = create_test_storage();
        storage.rules.insert(Rule::new("Old", "code", r"\d+")).unwrap();

        let imported = vec![
            Rule::new("Bank", "otp", r"\d{4}"),
            Rule::new("Bank", "otp", r"\d{4}"),
        ];
        let summary = RuleImporter::new(&storage).apply(imported, false).unwrap();

        assert_eq!(summary.replaced, 1);
        assert_eq!(storage.rules.count().unwrap(), 2);
        assert!(storage.paths().rules_file().exists());
    }

    #[test]
    fn test_summary_description() {
        let summary = ImportSummary {
            added: 3,
            skipped: 1,
            replaced: 0,
        };
        assert_eq!(summary.describe(true), "3 added, 1 skipped (retain)");
    }
}
