//! Dialog modules for the TUI
//!
//! Contains modal dialogs for rule entry, backup export and import

pub mod export;
pub mod help;
pub mod import;
pub mod rule_form;
