//! Audit log records
//!
//! Every line of the audit log is one [`AuditEntry`]: a rule that was added,
//! edited or removed, or a backup that was imported.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Rule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    RuleAdded,
    RuleEdited,
    RuleRemoved,
    BackupImported,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RuleAdded => "ADD",
            Self::RuleEdited => "EDIT",
            Self::RuleRemoved => "REMOVE",
            Self::BackupImported => "IMPORT",
        })
    }
}

/// One audited change
///
/// `subject` is the rule id for rule operations and the backup file name for
/// imports. `detail` holds the rule's content, the edited fields or the
/// import summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub detail: String,
}

impl AuditEntry {
    pub fn rule_added(rule: &Rule) -> Self {
        Self::for_rule(Operation::RuleAdded, rule, content_of(rule))
    }

    /// `changes` names the fields that differ from the stored rule
    pub fn rule_edited(rule: &Rule, changes: impl Into<String>) -> Self {
        Self::for_rule(Operation::RuleEdited, rule, changes.into())
    }

    pub fn rule_removed(rule: &Rule) -> Self {
        Self::for_rule(Operation::RuleRemoved, rule, content_of(rule))
    }

    pub fn backup_imported(source: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation: Operation::BackupImported,
            subject: source.into(),
            label: None,
            detail: summary.into(),
        }
    }

    fn for_rule(operation: Operation, rule: &Rule, detail: String) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            subject: rule.id.to_string(),
            label: Some(rule.to_string()),
            detail,
        }
    }
}

fn content_of(rule: &Rule) -> String {
    format!(
        "company='{}' keyword='{}' regex='{}' enabled={}",
        rule.company, rule.code_keyword, rule.code_regex, rule.enabled
    )
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.subject
        )?;
        if let Some(label) = &self.label {
            write!(f, " ({})", label)?;
        }
        write!(f, "\n  {}", self.detail)
    }
}
