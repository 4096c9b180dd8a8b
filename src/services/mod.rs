//! Service layer for smscode-rules
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, duplicate detection and auditing.

pub mod rule;

pub use rule::{CodeMatch, RuleEdit, RuleService};
