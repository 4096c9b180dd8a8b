//! Configuration module for smscode-rules
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - Backup directory resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::SmsCodePaths;
pub use settings::Settings;
