//! Rule service
//!
//! Business logic for rule management: validation, duplicate detection,
//! persistence and auditing.

use tracing::{debug, info};

use crate::audit::AuditEntry;
use crate::error::{SmsCodeError, SmsCodeResult};
use crate::models::{Rule, RuleId};
use crate::storage::Storage;

/// Field changes for [`RuleService::update`]
#[derive(Debug, Clone, Default)]
pub struct RuleEdit {
    pub company: Option<String>,
    pub code_keyword: Option<String>,
    pub code_regex: Option<String>,
    pub enabled: Option<bool>,
}

impl RuleEdit {
    /// Whether the edit changes nothing
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.code_keyword.is_none()
            && self.code_regex.is_none()
            && self.enabled.is_none()
    }
}

/// A rule that produced a code for a test message
#[derive(Debug, Clone)]
pub struct CodeMatch {
    pub rule: Rule,
    pub code: String,
}

/// Service for rule management
pub struct RuleService<'a> {
    storage: &'a Storage,
}

impl<'a> RuleService<'a> {
    /// Create a new rule service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new rule, appended to the end of the list
    pub fn create(&self, company: &str, code_keyword: &str, code_regex: &str) -> SmsCodeResult<Rule> {
        let rule = Rule::new(company.trim(), code_keyword.trim(), code_regex.trim());

        rule.validate()
            .map_err(|e| SmsCodeError::Validation(e.to_string()))?;
        self.ensure_unique(&rule)?;

        self.storage.rules.insert(rule.clone())?;
        self.storage.rules.save()?;

        self.storage.audit().log(&AuditEntry::rule_added(&rule))?;

        info!(rule = %rule.id, company = %rule.company, "rule created");
        Ok(rule)
    }

    /// Apply an edit to an existing rule
    pub fn update(&self, id: RuleId, edit: RuleEdit) -> SmsCodeResult<Rule> {
        let mut rule = self
            .storage
            .rules
            .get(id)?
            .ok_or_else(|| SmsCodeError::rule_not_found(id.to_string()))?;

        let before = rule.clone();
        rule.apply_edit(
            edit.company.map(|s| s.trim().to_string()),
            edit.code_keyword.map(|s| s.trim().to_string()),
            edit.code_regex.map(|s| s.trim().to_string()),
            edit.enabled,
        );

        rule.validate()
            .map_err(|e| SmsCodeError::Validation(e.to_string()))?;
        if rule.content() != before.content() {
            self.ensure_unique(&rule)?;
        }

        self.storage.rules.update(rule.clone())?;
        self.storage.rules.save()?;

        self.storage
            .audit()
            .log(&AuditEntry::rule_edited(&rule, describe_changes(&before, &rule)))?;

        debug!(rule = %rule.id, "rule updated");
        Ok(rule)
    }

    /// Delete a rule, returning it with the list position it occupied
    pub fn delete(&self, id: RuleId) -> SmsCodeResult<(usize, Rule)> {
        let (position, rule) = self
            .storage
            .rules
            .delete(id)?
            .ok_or_else(|| SmsCodeError::rule_not_found(id.to_string()))?;

        self.storage.rules.save()?;

        self.storage.audit().log(&AuditEntry::rule_removed(&rule))?;

        info!(rule = %id, "rule deleted");
        Ok((position, rule))
    }

    /// Get a rule by ID
    pub fn get(&self, id: RuleId) -> SmsCodeResult<Option<Rule>> {
        self.storage.rules.get(id)
    }

    /// Find a rule by ID or 1-based list position
    pub fn find(&self, identifier: &str) -> SmsCodeResult<Option<Rule>> {
        self.storage.rules.find(identifier)
    }

    /// List all rules in order
    pub fn list(&self) -> SmsCodeResult<Vec<Rule>> {
        self.storage.rules.get_all()
    }

    /// Count rules
    pub fn count(&self) -> SmsCodeResult<usize> {
        self.storage.rules.count()
    }

    /// Run every rule against a message and collect the codes found
    pub fn test_message(&self, sender: &str, body: &str) -> SmsCodeResult<Vec<CodeMatch>> {
        Ok(self
            .list()?
            .into_iter()
            .filter_map(|rule| {
                rule.extract_code(sender, body)
                    .map(|code| CodeMatch { rule, code })
            })
            .collect())
    }

    fn ensure_unique(&self, rule: &Rule) -> SmsCodeResult<()> {
        let content = rule.content();
        let exists = self
            .storage
            .rules
            .get_all()?
            .iter()
            .any(|r| r.id != rule.id && r.content() == content);

        if exists {
            return Err(SmsCodeError::Duplicate {
                entity_type: "Rule",
                identifier: rule.to_string(),
            });
        }
        Ok(())
    }
}

fn describe_changes(before: &Rule, after: &Rule) -> String {
    let mut changes = Vec::new();
    if before.company != after.company {
        changes.push(format!("company: '{}' -> '{}'", before.company, after.company));
    }
    if before.code_keyword != after.code_keyword {
        changes.push(format!(
            "keyword: '{}' -> '{}'",
            before.code_keyword, after.code_keyword
        ));
    }
    if before.code_regex != after.code_regex {
        changes.push(format!(
            "regex: '{}' -> '{}'",
            before.code_regex, after.code_regex
        ));
    }
    if before.enabled != after.enabled {
        changes.push(format!("enabled: {} -> {}", before.enabled, after.enabled));
    }
    if changes.is_empty() {
        "no changes".to_string()
    } else {
        changes.join(", ")
    }
}
