//! Lifecycle Module
//!
//! Ownership checks, the Draft/InReview/Published/Flagged state machine,
//! and race-safe vote commits.

pub mod manager;
pub mod receipt;

pub use manager::ArticleLifecycleManager;
pub use receipt::VoteReceipt;
