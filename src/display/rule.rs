//! Rule display formatting
//!
//! Formats rules for terminal output in table and detail views.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Rule;
use crate::services::CodeMatch;

/// Widest regex shown in the list table
const REGEX_COLUMN_WIDTH: usize = 32;

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Keyword")]
    keyword: String,
    #[tabled(rename = "Regex")]
    regex: String,
    #[tabled(rename = "Enabled")]
    enabled: &'static str,
}

/// Format the rule list as a table
pub fn format_rule_list(rules: &[Rule]) -> String {
    if rules.is_empty() {
        return "No rules found.".to_string();
    }

    let rows = rules.iter().enumerate().map(|(i, rule)| RuleRow {
        position: i + 1,
        id: rule.id.to_string(),
        company: rule.company.clone(),
        keyword: rule.code_keyword.clone(),
        regex: truncate(&rule.code_regex, REGEX_COLUMN_WIDTH),
        enabled: if rule.enabled { "yes" } else { "no" },
    });

    let mut output = Table::new(rows).with(Style::psql()).to_string();
    output.push_str(&format!("\n\nTotal: {} rule(s)", rules.len()));
    output
}

/// Format a single rule's details
pub fn format_rule_details(rule: &Rule, position: Option<usize>) -> String {
    let mut output = String::new();

    output.push_str(&format!("Rule: {}\n", rule));
    output.push_str(&format!("  ID:        {}\n", rule.id));
    if let Some(position) = position {
        output.push_str(&format!("  Position:  {}\n", position + 1));
    }
    output.push_str(&format!("  Company:   {}\n", rule.company));
    output.push_str(&format!("  Keyword:   {}\n", rule.code_keyword));
    output.push_str(&format!("  Regex:     {}\n", rule.code_regex));
    output.push_str(&format!(
        "  Enabled:   {}\n",
        if rule.enabled { "Yes" } else { "No" }
    ));
    output.push_str(&format!(
        "  Created:   {}\n",
        rule.created_at.format("%Y-%m-%d %H:%M")
    ));
    output.push_str(&format!(
        "  Updated:   {}\n",
        rule.updated_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

/// Format the codes found by testing a message
pub fn format_code_matches(matches: &[CodeMatch]) -> String {
    if matches.is_empty() {
        return "No rule matched the message.".to_string();
    }

    matches
        .iter()
        .map(|m| format!("{:<12} {}", m.code, m.rule))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate a string to a maximum number of characters
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format_rule_list(&[]), "No rules found.");
    }

    #[test]
    fn test_format_rule_list() {
        let mut disabled = Rule::new("Bank", "otp", r"\d{4}");
        disabled.enabled = false;
        let rules = vec![Rule::new("Acme", "code", r"\d{6}"), disabled];

        let output = format_rule_list(&rules);
        assert!(output.contains("Company"));
        assert!(output.contains("Acme"));
        assert!(output.contains("Bank"));
        assert!(output.contains("Total: 2 rule(s)"));
    }

    #[test]
    fn test_format_details() {
        let rule = Rule::new("Acme", "code", r"\d{6}");
        let output = format_rule_details(&rule, Some(0));

        assert!(output.contains("Position:  1"));
        assert!(output.contains(&rule.id.to_string()));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
