//! Consensus Module
//!
//! Weighted approval consensus over reviewer roles:
//! - Integer tally of active votes per review cycle
//! - Veto on any rejection
//! - Publication at 100% of configured weight

pub mod engine;
pub mod voting;

pub use engine::{ApprovalConsensusEngine, ConsensusOutcome};
pub use voting::ApprovalTally;
