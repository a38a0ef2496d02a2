//! Audit trail for budget mutations
//!
//! Every create, update and delete on a line item, transaction or goal is
//! appended to `audit.log` as one JSON object per line, with the entity's
//! JSON form before and after the change.

mod entry;
mod logger;

pub use entry::{summarize_changes, AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
