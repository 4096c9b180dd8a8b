//! Audit logging for smscode-rules
//!
//! Rule additions, edits and removals, and backup imports, appended to a
//! line-delimited JSON log under the data directory.

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
