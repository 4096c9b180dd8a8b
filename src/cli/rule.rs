//! Rule CLI commands
//!
//! Implements CLI commands for rule management.

use clap::Subcommand;

use crate::display::{format_code_matches, format_rule_details, format_rule_list};
use crate::error::{SmsCodeError, SmsCodeResult};
use crate::services::{RuleEdit, RuleService};
use crate::storage::Storage;

/// Rule subcommands
#[derive(Subcommand)]
pub enum RuleCommands {
    /// Add a rule at the end of the list
    Add {
        /// Company or sender the message must mention
        company: String,
        /// Keyword that marks a message as carrying a code
        keyword: String,
        /// Regex that extracts the code (first capture group if present)
        regex: String,
        /// Add the rule disabled
        #[arg(long)]
        disabled: bool,
    },
    /// List all rules in order
    List,
    /// Show rule details
    Show {
        /// Rule ID or list position
        rule: String,
    },
    /// Edit a rule
    Edit {
        /// Rule ID or list position
        rule: String,
        /// New company
        #[arg(short, long)]
        company: Option<String>,
        /// New keyword
        #[arg(short, long)]
        keyword: Option<String>,
        /// New regex
        #[arg(short, long)]
        regex: Option<String>,
        /// Enable the rule
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        /// Disable the rule
        #[arg(long)]
        disable: bool,
    },
    /// Delete a rule
    Delete {
        /// Rule ID or list position
        rule: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Run the rules against a message and print any codes found
    Test {
        /// Message body
        body: String,
        /// Message sender
        #[arg(short, long, default_value = "")]
        sender: String,
    },
}

/// Handle a rule command
pub fn handle_rule_command(storage: &Storage, cmd: RuleCommands) -> SmsCodeResult<()> {
    let service = RuleService::new(storage);

    match cmd {
        RuleCommands::Add {
            company,
            keyword,
            regex,
            disabled,
        } => {
            let mut rule = service.create(&company, &keyword, &regex)?;
            if disabled {
                rule = service.update(
                    rule.id,
                    RuleEdit {
                        enabled: Some(false),
                        ..Default::default()
                    },
                )?;
            }
            println!("Added rule: {}", rule);
            println!("  ID: {}", rule.id);
        }

        RuleCommands::List => {
            println!("{}", format_rule_list(&service.list()?));
        }

        RuleCommands::Show { rule } => {
            let r = service
                .find(&rule)?
                .ok_or_else(|| SmsCodeError::rule_not_found(&rule))?;
            let position = storage.rules.position(r.id)?;
            print!("{}", format_rule_details(&r, position));
        }

        RuleCommands::Edit {
            rule,
            company,
            keyword,
            regex,
            enable,
            disable,
        } => {
            let r = service
                .find(&rule)?
                .ok_or_else(|| SmsCodeError::rule_not_found(&rule))?;

            let edit = RuleEdit {
                company,
                code_keyword: keyword,
                code_regex: regex,
                enabled: match (enable, disable) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };

            if edit.is_empty() {
                println!("Nothing to change. Use --company, --keyword, --regex, --enable or --disable.");
                return Ok(());
            }

            let updated = service.update(r.id, edit)?;
            println!("Updated rule: {}", updated);
        }

        RuleCommands::Delete { rule, force } => {
            let r = service
                .find(&rule)?
                .ok_or_else(|| SmsCodeError::rule_not_found(&rule))?;

            if !force {
                println!("About to delete rule: {}", r);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let (_, deleted) = service.delete(r.id)?;
            println!("Deleted rule: {}", deleted);
        }

        RuleCommands::Test { body, sender } => {
            let matches = service.test_message(&sender, &body)?;
            println!("{}", format_code_matches(&matches));
        }
    }

    Ok(())
}
