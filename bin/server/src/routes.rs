//! HTTP handlers.

use crate::error::ApiError;
use crate::middleware::SignedPrincipal;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use gatehouse_authz::{AccessRecord, Permissions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

/// Returns the capability set of the request's signer.
pub async fn permissions(principal: SignedPrincipal) -> Json<Permissions> {
    Json(principal.permissions)
}

/// Body of a decision request.
///
/// The principal is always the request's signer; there is no way to name
/// another one in the body.
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    /// The protected object.
    pub object: AccessRecord,
    /// The action being attempted.
    pub action: String,
}

/// Body of a decision response.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecideResponse {
    pub allowed: bool,
}

/// Decides whether the request's signer may perform an action on an object.
///
/// Unsigned requests are decided for the anonymous principal. If the
/// signature covers `Digest`, the body must match it or the request is
/// decided as anonymous.
pub async fn decide(
    State(state): State<Arc<AppState>>,
    principal: SignedPrincipal,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DecideResponse>, ApiError> {
    let principal = principal.with_body(&headers, &body);
    let Json(request) = Json::<DecideRequest>::from_bytes(&body).map_err(|e| {
        debug!(error = %e, "rejected decision request");
        ApiError::BadRequest {
            details: e.body_text(),
        }
    })?;

    let auth = principal.authorization.unwrap_or_default();

    let allowed = state
        .evaluator
        .user_can(&auth, &state.policy, &request.object, &request.action)
        .await
        .map_err(|e| {
            error!(error = %e, action = %request.action, "access decision failed");
            ApiError::Internal
        })?;

    info!(action = %request.action, state = %request.object.state, allowed, "access decided");
    Ok(Json(DecideResponse { allowed }))
}
