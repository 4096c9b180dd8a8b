//! Display formatting for terminal output
//!
//! Formats rules and backup files for the command line.

pub mod backup;
pub mod rule;

pub use backup::{format_backup_list, format_size};
pub use rule::{format_code_matches, format_rule_details, format_rule_list};
