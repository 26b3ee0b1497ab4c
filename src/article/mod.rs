//! Article Module
//!
//! Article records, the status state machine, and the transactional
//! article-state store.

pub mod model;
pub mod store;

pub use model::{Article, ArticleStatus};
pub use store::{
    ArticleFilter, ArticleSnapshot, ArticleStateStore, InMemoryArticleStore, TransitionOutcome,
};
