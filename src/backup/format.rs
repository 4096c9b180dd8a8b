//! Backup file format
//!
//! A backup is a JSON object written with its `version` key first, followed
//! by the rule records in list order:
//!
//! ```json
//! {
//!   "version": 1,
//!   "rules": [
//!     { "company": "Acme", "keyword": "code", "regex": "\\d{6}", "enabled": true }
//!   ]
//! }
//! ```
//!
//! Records carry no ids or timestamps; imported rules get fresh ones.

use serde::{Deserialize, Serialize};

use crate::models::Rule;

/// Version written by this build
pub const BACKUP_VERSION: u64 = 1;

/// Versions this build can read
pub const SUPPORTED_VERSIONS: &[u64] = &[1];

/// Key holding the version marker
pub const VERSION_KEY: &str = "version";

/// Key holding the rule records
pub const RULES_KEY: &str = "rules";

/// A rule as stored in a backup file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleRecord {
    pub company: String,
    pub keyword: String,
    pub regex: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl From<&Rule> for RuleRecord {
    fn from(rule: &Rule) -> Self {
        Self {
            company: rule.company.clone(),
            keyword: rule.code_keyword.clone(),
            regex: rule.code_regex.clone(),
            enabled: rule.enabled,
        }
    }
}

impl RuleRecord {
    /// Build a new rule from this record
    pub fn into_rule(self) -> Rule {
        let mut rule = Rule::new(self.company, self.keyword, self.regex);
        rule.enabled = self.enabled;
        rule
    }
}

/// Serialized form of a whole backup
#[derive(Debug, Serialize)]
pub(crate) struct BackupDocument<'a> {
    pub version: u64,
    pub rules: &'a [RuleRecord],
}
