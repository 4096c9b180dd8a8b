//! Core data models for smscode-rules
//!
//! Rules and the strongly-typed IDs that identify them.

pub mod ids;
pub mod rule;

pub use ids::RuleId;
pub use rule::{Rule, RuleContent, RuleValidationError};
