//! Audit trail for the gesture lock.
//!
//! Counts recordings and unlock outcomes so an operator can see how the
//! lock has been used, without keeping any gesture data.

pub mod log;

// Re-export commonly used types
pub use log::{
    create_shared_log, create_shared_log_with_persistence, AuditLog, AuditStats, SharedAuditLog,
};
