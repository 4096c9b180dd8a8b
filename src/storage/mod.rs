//! Storage layer for smscode-rules
//!
//! The rule list lives in `data/rules.json`, replaced atomically on every
//! save. The audit log sits in the base directory.

pub mod rules;

pub use rules::RuleRepository;

use crate::audit::AuditLogger;
use crate::config::paths::SmsCodePaths;
use crate::error::SmsCodeError;

/// Main storage coordinator
pub struct Storage {
    paths: SmsCodePaths,
    pub rules: RuleRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: SmsCodePaths) -> Result<Self, SmsCodeError> {
        paths.ensure_directories()?;

        Ok(Self {
            rules: RuleRepository::new(paths.rules_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &SmsCodePaths {
        &self.paths
    }

    /// Get the audit logger
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), SmsCodeError> {
        self.rules.load()
    }
}
