//! Backup file display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::backup::BackupFileInfo;

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

/// Format backup files as a table
pub fn format_backup_list(backups: &[BackupFileInfo]) -> String {
    if backups.is_empty() {
        return "No backup exists.".to_string();
    }

    let rows = backups.iter().enumerate().map(|(i, backup)| BackupRow {
        position: i + 1,
        filename: backup.filename.clone(),
        size: format_size(backup.size_bytes),
        modified: backup
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string()),
    });

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push_str(&format!("\n\nTotal: {} backup(s)", backups.len()));
    output
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
