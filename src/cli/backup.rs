//! Backup CLI commands
//!
//! Implements CLI commands for exporting and importing the rule list.

use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::backup::{is_valid_filename, BackupManager, ExportResult};
use crate::config::paths::SmsCodePaths;
use crate::config::settings::Settings;
use crate::display::format_backup_list;
use crate::error::{SmsCodeError, SmsCodeResult};
use crate::storage::Storage;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Export all rules to a backup file
    Export {
        /// File name or path (defaults to bak-<date>.scebak in the backup directory)
        file: Option<String>,

        /// Backup directory to use instead of the configured one
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Import rules from a backup file
    Import {
        /// Backup file name or path (use 'latest' for the most recent)
        backup: String,

        /// Keep existing rules and add the imported ones
        #[arg(short, long)]
        retain: bool,

        /// Replace existing rules without confirmation
        #[arg(short, long)]
        force: bool,

        /// Backup directory to use instead of the configured one
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// List backup files
    List {
        /// Backup directory to use instead of the configured one
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Show the backup directory
    Dir,
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> SmsCodeResult<()> {
    let paths = storage.paths();

    match cmd {
        BackupCommands::Export { file, dir } => {
            let manager = manager_for(settings, paths, dir);
            let rules = storage.rules.get_all()?;

            if rules.is_empty() {
                return Err(SmsCodeError::Backup(
                    "No rules to export. Add one with: smscode rule add".into(),
                ));
            }

            let destination = match file {
                Some(name) => {
                    let destination = manager.resolve(&name);
                    check_filename(&destination)?;
                    destination
                }
                None => manager
                    .backup_dir()
                    .join(manager.default_backup_filename_today()),
            };

            match BackupManager::export_rule_list(&destination, &rules) {
                ExportResult::Success => {
                    println!("Exported {} rule(s) to {}", rules.len(), destination.display());
                }
                result => return Err(SmsCodeError::Backup(result.message().to_string())),
            }
        }

        BackupCommands::Import {
            backup,
            retain,
            force,
            dir,
        } => {
            let manager = manager_for(settings, paths, dir);
            let source = resolve_backup_path(&manager, &backup)?;

            let existing = storage.rules.count()?;
            if !retain && existing > 0 && !force {
                println!("Import from: {}", source.display());
                println!(
                    "WARNING: This will replace all {} existing rule(s)!",
                    existing
                );
                println!("Run again with --retain to keep them, or --force to replace them:");
                println!("  smscode backup import {} --force", backup);
                return Ok(());
            }

            match BackupManager::import_with_summary(&source, retain, storage) {
                Ok(summary) => {
                    println!("Imported rules from {}", source.display());
                    println!("{}", summary.describe(retain));
                }
                Err(result) => return Err(SmsCodeError::Backup(result.message().to_string())),
            }
        }

        BackupCommands::List { dir } => {
            let manager = manager_for(settings, paths, dir);
            println!("Backup directory: {}", manager.backup_dir().display());
            println!();
            println!("{}", format_backup_list(&manager.list_backup_files()?));
        }

        BackupCommands::Dir => {
            println!("{}", settings.resolve_backup_dir(paths).display());
        }
    }

    Ok(())
}

fn manager_for(settings: &Settings, paths: &SmsCodePaths, dir: Option<PathBuf>) -> BackupManager {
    match dir {
        Some(dir) => BackupManager::new(dir),
        None => BackupManager::from_settings(settings, paths),
    }
}

fn check_filename(path: &Path) -> SmsCodeResult<()> {
    let valid = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(is_valid_filename)
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(SmsCodeError::Validation(format!(
            "Invalid backup file name: {}",
            path.display()
        )))
    }
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(manager: &BackupManager, backup: &str) -> SmsCodeResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| SmsCodeError::Backup("No backup exists".into()));
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    Ok(manager.resolve(backup))
}
