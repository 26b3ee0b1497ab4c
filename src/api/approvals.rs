//! Approval endpoints.

use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::identity::require_actor;
use crate::api::state::AppState;
use crate::article::Article;
use crate::audit::{ApprovalRecord, Decision};
use crate::core::{Actor, ArticleId};
use crate::lifecycle::VoteReceipt;
use crate::roles::Role;
use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

type ApiResult<T> = Result<T, ApiError>;

/// Body of `POST /approvals/{articleId}`.
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub status: Decision,
    #[serde(default)]
    pub comments: Option<String>,
    /// Role to vote in; defaults to a voting role of the caller that has
    /// not voted in the current cycle
    #[serde(default)]
    pub role: Option<Role>,
}

/// `POST /approvals/{articleId}`
pub async fn cast_vote(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    ApiPath(article_id): ApiPath<ArticleId>,
    ApiJson(body): ApiJson<VoteRequest>,
) -> ApiResult<Json<VoteReceipt>> {
    let actor = require_actor(actor)?;
    let role = match body.role {
        Some(role) => role,
        None => state.lifecycle.default_vote_role(article_id, &actor)?,
    };
    let comment = body.comments.filter(|c| !c.is_empty());

    let receipt = state.lifecycle.record_vote_with_retry(
        article_id,
        &actor,
        role,
        body.status,
        comment,
        state.conflict_retries,
    )?;
    Ok(Json(receipt))
}

/// `GET /approvals/pending`
pub async fn pending(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
) -> ApiResult<Json<Vec<Article>>> {
    let actor = require_actor(actor)?;
    Ok(Json(state.lifecycle.pending_for(&actor)?))
}

/// `GET /approvals/{articleId}/history`
pub async fn history(
    State(state): State<AppState>,
    ApiPath(article_id): ApiPath<ArticleId>,
) -> ApiResult<Json<Vec<ApprovalRecord>>> {
    Ok(Json(state.lifecycle.history(article_id)?))
}
