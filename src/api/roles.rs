//! Role weight administration and health.

use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::identity::require_actor;
use crate::api::state::AppState;
use crate::core::{Actor, Error};
use crate::roles::{Role, RoleWeightRegistry};
use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role weights as exchanged over HTTP.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightsBody {
    pub weights: BTreeMap<String, i64>,
    #[serde(default)]
    pub total_weight: u32,
}

impl WeightsBody {
    fn from_registry(registry: &RoleWeightRegistry) -> Self {
        Self {
            weights: registry.to_names(),
            total_weight: registry.total_weight(),
        }
    }
}

/// `GET /roles/weights`
pub async fn get_weights(State(state): State<AppState>) -> Result<Json<WeightsBody>, ApiError> {
    let registry = state.lifecycle.registry().snapshot()?;
    Ok(Json(WeightsBody::from_registry(&registry)))
}

/// `PUT /roles/weights` (administrators only)
pub async fn replace_weights(
    State(state): State<AppState>,
    actor: Option<Extension<Actor>>,
    ApiJson(body): ApiJson<WeightsBody>,
) -> Result<Json<WeightsBody>, ApiError> {
    let actor = require_actor(actor)?;
    if !actor.has_role(Role::Administrator) {
        return Err(Error::Authorization("only administrators may change role weights".into()).into());
    }

    let registry = RoleWeightRegistry::from_names(&body.weights)?;
    let installed = state.lifecycle.registry().replace(registry)?;
    tracing::info!(by = %actor.id, "role weights updated");
    Ok(Json(WeightsBody::from_registry(&installed)))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
