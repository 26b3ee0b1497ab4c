//! Caller identity.
//!
//! The gateway in front of this service verifies the caller's token and
//! forwards the resolved identity as headers. This middleware turns them
//! into an [`Actor`] request extension; requests without them continue
//! anonymously.

use crate::api::error::ApiError;
use crate::core::{Actor, Error, Result};
use crate::roles::Role;
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use tracing::debug;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USERNAME_HEADER: &str = "x-username";
pub const ROLES_HEADER: &str = "x-user-roles";

/// Identity middleware.
pub async fn resolve_identity(mut request: Request, next: Next) -> Response {
    match actor_from_headers(request.headers()) {
        Ok(Some(actor)) => {
            debug!(user = %actor.id, roles = ?actor.roles, "resolved caller");
            request.extensions_mut().insert(actor);
        }
        Ok(None) => debug!("anonymous request"),
        Err(err) => return ApiError::from(err).into_response(),
    }
    next.run(request).await
}

/// Unwrap the caller resolved by [`resolve_identity`].
pub fn require_actor(actor: Option<Extension<Actor>>) -> std::result::Result<Actor, ApiError> {
    actor
        .map(|Extension(actor)| actor)
        .ok_or(ApiError::Unauthenticated)
}

fn actor_from_headers(headers: &HeaderMap) -> Result<Option<Actor>> {
    let Some(id) = header(headers, USER_ID_HEADER)? else {
        return Ok(None);
    };
    let username = header(headers, USERNAME_HEADER)?.unwrap_or_else(|| id.clone());
    let roles = match header(headers, ROLES_HEADER)? {
        Some(raw) => Role::parse_list(&raw)?,
        None => Vec::new(),
    };
    Ok(Some(Actor::new(&id, &username, roles)))
}

fn header(headers: &HeaderMap, name: &str) -> Result<Option<String>> {
    match headers.get(name) {
        None => Ok(None),
        Some(value) => {
            let value = value
                .to_str()
                .map_err(|_| Error::Validation(format!("header {} is not valid text", name)))?
                .trim();
            Ok((!value.is_empty()).then(|| value.to_string()))
        }
    }
}
