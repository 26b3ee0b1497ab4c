//! # Editorial
//!
//! Article publication lifecycle with weighted multi-role approval:
//! - **Article**: Draft → InReview → Published / Flagged state machine
//! - **Consensus**: weighted approval, single-rejection veto
//! - **Audit**: append-only ledger of every vote
//!
//! ## Quick Start
//!
//! ```rust
//! use editorial::audit::Decision;
//! use editorial::core::{Actor, UserId};
//! use editorial::lifecycle::ArticleLifecycleManager;
//! use editorial::roles::{RegistryHandle, Role};
//!
//! let manager = ArticleLifecycleManager::in_memory(RegistryHandle::default());
//! let author = UserId::new("reporter-1");
//! let article = manager
//!     .create(&author, "Harbor vote", "The council approved the harbor plan.")
//!     .unwrap();
//! manager.submit_for_review(article.id, &author).unwrap();
//!
//! let editor = Actor::new("editor-1", "edna", vec![Role::Editor]);
//! let receipt = manager
//!     .record_vote(article.id, &editor, Role::Editor, Decision::Approved, None)
//!     .unwrap();
//! assert_eq!(receipt.current_approval_percentage, 30);
//! ```

pub mod api;
pub mod article;
pub mod audit;
pub mod config;
pub mod consensus;
pub mod core;
pub mod lifecycle;
pub mod roles;

pub use crate::core::error::{Error, Result};
