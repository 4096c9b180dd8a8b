//! Writes the rule list to a backup file

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{SmsCodeError, SmsCodeResult};
use crate::models::Rule;

use super::format::{BackupDocument, RuleRecord, BACKUP_VERSION};

/// Serializes rules into the backup format
pub struct RuleExporter<'a> {
    rules: &'a [Rule],
}

impl<'a> RuleExporter<'a> {
    pub fn new(rules: &'a [Rule]) -> Self {
        Self { rules }
    }

    /// Write the backup to `destination`, creating its parent directory
    ///
    /// The file handle lives only for this call. On failure the destination
    /// keeps whatever was flushed before the error.
    pub fn export_to(&self, destination: &Path) -> SmsCodeResult<()> {
        if let Some(parent) = destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    SmsCodeError::Io(format!("Failed to create backup directory: {}", e))
                })?;
            }
        }

        let file = File::create(destination)
            .map_err(|e| SmsCodeError::Io(format!("Failed to create backup file: {}", e)))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer
            .flush()
            .map_err(|e| SmsCodeError::Io(format!("Failed to write backup file: {}", e)))?;

        Ok(())
    }

    /// Write the backup document to any writer
    pub fn write<W: Write>(&self, writer: W) -> SmsCodeResult<()> {
        let records: Vec<RuleRecord> = self.rules.iter().map(RuleRecord::from).collect();
        let document = BackupDocument {
            version: BACKUP_VERSION,
            rules: &records,
        };

        serde_json::to_writer_pretty(writer, &document)
            .map_err(|e| SmsCodeError::Io(format!("Failed to write backup file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let destination = temp_dir
            .path()
            .join("nested")
            .join("SmsCodeExtractor")
            .join("bak-2024-01-01.scebak");

        let rules = vec![Rule::new("Acme", "code", r"\d{6}")];
        RuleExporter::new(&rules).export_to(&destination).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&destination).unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["rules"][0]["company"], "Acme");
    }

    #[test]
    fn test_export_empty_list() {
        let mut buffer = Vec::new();
        RuleExporter::new(&[]).write(&mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["rules"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_export_into_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let rules = vec![Rule::new("Acme", "code", r"\d{6}")];

        let result = RuleExporter::new(&rules).export_to(temp_dir.path());
        assert!(matches!(result, Err(SmsCodeError::Io(_))));
    }
}
