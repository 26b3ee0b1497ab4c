//! Audit Module
//!
//! Append-only ledger of every approval and rejection:
//! - Immutable, digest-protected approval records
//! - Per-article history ordered by timestamp
//! - Cycle-scoped "has this role voted" queries

pub mod history;
pub mod record;

pub use history::{AuditHistoryStore, InMemoryHistory, VerificationResult};
pub use record::{ApprovalRecord, Decision};
