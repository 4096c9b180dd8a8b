//! Rule model
//!
//! A rule describes which SMS messages carry a verification code and how to
//! pull the code out of the message body.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RuleId;

/// A user-defined code extraction rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier
    pub id: RuleId,

    /// Sender or company name the message must mention
    pub company: String,

    /// Keyword that marks a message as carrying a code
    pub code_keyword: String,

    /// Regex used to extract the code
    pub code_regex: String,

    /// Disabled rules are kept but never match
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// When the rule was created
    pub created_at: DateTime<Utc>,

    /// When the rule was last modified
    pub updated_at: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

/// The content of a rule, without identity or timestamps
///
/// Two rules with equal content are duplicates for import purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleContent {
    pub company: String,
    pub code_keyword: String,
    pub code_regex: String,
}

impl Rule {
    /// Create a new enabled rule
    pub fn new(
        company: impl Into<String>,
        code_keyword: impl Into<String>,
        code_regex: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: RuleId::new(),
            company: company.into(),
            code_keyword: code_keyword.into(),
            code_regex: code_regex.into(),
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Content used for duplicate detection
    pub fn content(&self) -> RuleContent {
        RuleContent {
            company: self.company.clone(),
            code_keyword: self.code_keyword.clone(),
            code_regex: self.code_regex.clone(),
        }
    }

    /// Validate the rule
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        for (field, value) in [
            ("company", &self.company),
            ("keyword", &self.code_keyword),
            ("regex", &self.code_regex),
        ] {
            if value.trim().is_empty() {
                return Err(RuleValidationError::EmptyField(field));
            }
        }

        Regex::new(&self.code_regex)
            .map_err(|e| RuleValidationError::InvalidRegex(e.to_string()))?;

        Ok(())
    }

    /// Try to extract a verification code from a message
    ///
    /// The rule applies when it is enabled, the company appears in the sender
    /// or body, and the keyword appears in the body (both case-insensitive).
    /// Returns the first capture group of `code_regex` if it has one,
    /// otherwise the whole match.
    pub fn extract_code(&self, sender: &str, body: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let company = self.company.to_lowercase();
        let lowered_body = body.to_lowercase();
        if !sender.to_lowercase().contains(&company) && !lowered_body.contains(&company) {
            return None;
        }
        if !lowered_body.contains(&self.code_keyword.to_lowercase()) {
            return None;
        }

        let regex = Regex::new(&self.code_regex).ok()?;
        let captures = regex.captures(body)?;
        captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|m| m.as_str().to_string())
    }

    /// Replace the editable fields, bumping `updated_at`
    pub fn apply_edit(
        &mut self,
        company: Option<String>,
        code_keyword: Option<String>,
        code_regex: Option<String>,
        enabled: Option<bool>,
    ) {
        if let Some(company) = company {
            self.company = company;
        }
        if let Some(keyword) = code_keyword {
            self.code_keyword = keyword;
        }
        if let Some(regex) = code_regex {
            self.code_regex = regex;
        }
        if let Some(enabled) = enabled {
            self.enabled = enabled;
        }
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.company, self.code_keyword)
    }
}

/// Validation errors for rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValidationError {
    EmptyField(&'static str),
    InvalidRegex(String),
}

impl fmt::Display for RuleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "Rule {} cannot be empty", field),
            Self::InvalidRegex(msg) => write!(f, "Invalid code regex: {}", msg),
        }
    }
}

impl std::error::Error for RuleValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_rule() -> Rule {
        Rule::new("ExampleBank", "verification code", r"(?<![0-9])([0-9]{6})(?![0-9])")
    }

    #[test]
    fn test_new_rule() {
        let rule = Rule::new("Acme", "code", r"\d{4}");
        assert_eq!(rule.company, "Acme");
        assert!(rule.enabled);
        assert_eq!(rule.created_at, rule.updated_at);
    }

    #[test]
    fn test_validate_empty_field() {
        let rule = Rule::new("  ", "code", r"\d{4}");
        assert_eq!(
            rule.validate(),
            Err(RuleValidationError::EmptyField("company"))
        );
    }

    #[test]
    fn test_validate_accepts_long_fields() {
        let regex = format!("(\\d{{6}})|{}", "x".repeat(400));
        let rule = Rule::new("Acme", "code", &regex);
        assert_eq!(rule.validate(), Ok(()));
    }

    #[test]
    fn test_validate_bad_regex() {
        // The regex crate has no lookaround support
        let rule = bank_rule();
        assert!(matches!(
            rule.validate(),
            Err(RuleValidationError::InvalidRegex(_))
        ));
    }

    #[test]
    fn test_extract_code_with_group() {
        let rule = Rule::new("ExampleBank", "verification code", r"code is (\d{6})");
        let body = "[ExampleBank] Your verification code is 482913, valid for 5 minutes.";

        assert_eq!(
            rule.extract_code("+15550100", body),
            Some("482913".to_string())
        );
    }

    #[test]
    fn test_extract_code_whole_match() {
        let rule = Rule::new("acme", "otp", r"\b\d{4}\b");
        assert_eq!(
            rule.extract_code("ACME", "Your OTP: 7312"),
            Some("7312".to_string())
        );
    }

    #[test]
    fn test_extract_code_requires_company_and_keyword() {
        let rule = Rule::new("Acme", "otp", r"\d{4}");
        assert_eq!(rule.extract_code("Other", "Your OTP: 7312"), None);
        assert_eq!(rule.extract_code("Acme", "Your PIN: 7312"), None);
    }

    #[test]
    fn test_disabled_rule_never_matches() {
        let mut rule = Rule::new("Acme", "otp", r"\d{4}");
        rule.apply_edit(None, None, None, Some(false));
        assert_eq!(rule.extract_code("Acme", "Your OTP: 7312"), None);
    }

    #[test]
    fn test_content_ignores_identity() {
        let a = Rule::new("Acme", "otp", r"\d{4}");
        let b = Rule::new("Acme", "otp", r"\d{4}");
        assert_ne!(a.id, b.id);
        assert_eq!(a.content(), b.content());
    }
}
