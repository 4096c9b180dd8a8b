//! smscode-rules - verification-code extraction rules for the terminal
//!
//! This library manages the rules that pull one-time codes out of SMS
//! messages, and the versioned backup files that carry a rule list between
//! installations.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Rules and their identifiers
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `backup`: Versioned export and import of the rule list
//! - `logging`: `tracing` subscriber setup
//! - `cli`, `display`: Command line handlers and output formatting
//! - `tui`: The interactive rule list
//!
//! # Example
//!
//! ```rust,ignore
//! use smscode_rules::backup::{BackupManager, ExportResult};
//! use smscode_rules::config::{paths::SmsCodePaths, settings::Settings};
//! use smscode_rules::storage::Storage;
//!
//! let paths = SmsCodePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths.clone())?;
//! storage.load_all()?;
//!
//! let manager = BackupManager::from_settings(&settings, &paths);
//! let destination = manager.backup_dir().join(manager.default_backup_filename_today());
//! let result = BackupManager::export_rule_list(&destination, &storage.rules.get_all()?);
//! assert_eq!(result, ExportResult::Success);
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod storage;
pub mod tui;

pub use error::{SmsCodeError, SmsCodeResult};
