//! HTTP API
//!
//! REST surface over the lifecycle manager:
//! - `/articles` authoring and review submission
//! - `/approvals` voting, pending queues and history
//! - `/roles/weights` role weight administration

pub mod approvals;
pub mod articles;
pub mod error;
pub mod extract;
pub mod identity;
pub mod roles;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use state::AppState;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(roles::health))
        .route(
            "/articles",
            post(articles::create).get(articles::list_published),
        )
        .route("/articles/pending", get(articles::list_pending))
        .route("/articles/my-articles", get(articles::list_mine))
        .route("/articles/author/:author_id", get(articles::list_by_author))
        .route(
            "/articles/:id",
            get(articles::get_one)
                .put(articles::update)
                .delete(articles::delete),
        )
        .route("/articles/:id/send-to-review", put(articles::send_to_review))
        .route("/approvals/pending", get(approvals::pending))
        .route("/approvals/:article_id", post(approvals::cast_vote))
        .route("/approvals/:article_id/history", get(approvals::history))
        .route(
            "/roles/weights",
            get(roles::get_weights).put(roles::replace_weights),
        )
        .layer(middleware::from_fn(identity::resolve_identity))
        .with_state(state)
}
