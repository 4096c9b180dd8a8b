//! Custom error types for smscode-rules
//!
//! This module defines the error hierarchy for the application using thiserror.
//! Backup import/export never surface these to callers directly; they are
//! collapsed into the outcome tags in [`crate::backup`].

use thiserror::Error;

/// The main error type for smscode-rules operations
#[derive(Error, Debug)]
pub enum SmsCodeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Backup errors that happen outside an export/import call
    #[error("Backup error: {0}")]
    Backup(String),
}

impl SmsCodeError {
    /// Create a "not found" error for rules
    pub fn rule_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Rule",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for SmsCodeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SmsCodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<regex::Error> for SmsCodeError {
    fn from(err: regex::Error) -> Self {
        Self::Validation(format!("Invalid code regex: {}", err))
    }
}

/// Result type alias for smscode-rules operations
pub type SmsCodeResult<T> = Result<T, SmsCodeError>;
