//! Article endpoints.

use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath};
use crate::api::identity::require_actor;
use crate::api::state::AppState;
use crate::article::Article;
use crate::core::{Actor, ArticleId, UserId};
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

type ApiResult<T> = Result<T, ApiError>;

/// Body of create and update requests.
#[derive(Debug, Deserialize)]
pub struct ArticleRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /articles`
pub async fn create(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    ApiJson(body): ApiJson<ArticleRequest>,
) -> ApiResult<(StatusCode, Json<Article>)> {
    let actor = require_actor(actor)?;
    let article = state
        .lifecycle
        .create(&actor.id, &body.title, &body.content)?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// `PUT /articles/{id}`
pub async fn update(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    ApiPath(id): ApiPath<ArticleId>,
    ApiJson(body): ApiJson<ArticleRequest>,
) -> ApiResult<Json<Article>> {
    let actor = require_actor(actor)?;
    let article = state
        .lifecycle
        .update(id, &actor.id, &body.title, &body.content)?;
    Ok(Json(article))
}

/// `DELETE /articles/{id}`
pub async fn delete(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    ApiPath(id): ApiPath<ArticleId>,
) -> ApiResult<Json<MessageResponse>> {
    let actor = require_actor(actor)?;
    let removed = state.lifecycle.delete(id, &actor.id)?;
    Ok(Json(MessageResponse {
        message: format!("Article '{}' deleted", removed.title),
    }))
}

/// `GET /articles/{id}`
pub async fn get_one(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<ArticleId>,
) -> ApiResult<Json<Article>> {
    Ok(Json(state.lifecycle.get(id)?))
}

/// `GET /articles/author/{authorId}`
pub async fn list_by_author(
    State(state): State<AppState>,
    ApiPath(author_id): ApiPath<String>,
) -> ApiResult<Json<Vec<Article>>> {
    Ok(Json(state.lifecycle.list_by_author(&UserId(author_id))?))
}

/// `GET /articles/my-articles`
pub async fn list_mine(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
) -> ApiResult<Json<Vec<Article>>> {
    let actor = require_actor(actor)?;
    Ok(Json(state.lifecycle.list_by_author(&actor.id)?))
}

/// `GET /articles`
pub async fn list_published(State(state): State<AppState>) -> ApiResult<Json<Vec<Article>>> {
    Ok(Json(state.lifecycle.list_published()?))
}

/// `GET /articles/pending`
pub async fn list_pending(State(state): State<AppState>) -> ApiResult<Json<Vec<Article>>> {
    Ok(Json(state.lifecycle.list_pending()?))
}

/// `PUT /articles/{id}/send-to-review`
pub async fn send_to_review(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    ApiPath(id): ApiPath<ArticleId>,
) -> ApiResult<Json<Article>> {
    let actor = require_actor(actor)?;
    Ok(Json(state.lifecycle.submit_for_review(id, &actor.id)?))
}
