//! Shared handler state.

use crate::lifecycle::ArticleLifecycleManager;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<ArticleLifecycleManager>,
    /// Extra attempts for a vote that lost a commit race
    pub conflict_retries: u32,
}

impl AppState {
    pub fn new(lifecycle: ArticleLifecycleManager, conflict_retries: u32) -> Self {
        Self {
            lifecycle: Arc::new(lifecycle),
            conflict_retries,
        }
    }
}
