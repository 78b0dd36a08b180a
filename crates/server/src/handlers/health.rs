//! Health check handler.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub record_store: &'static str,
    pub geo_index: &'static str,
}

/// GET /v1/health - Liveness plus backend connectivity.
/// Intentionally unauthenticated for load balancers and probes.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    state.records.health_check().await?;
    state.geo.health_check().await?;

    Ok(Json(HealthResponse {
        status: "ok",
        record_store: state.records.backend_name(),
        geo_index: state.geo.backend_name(),
    }))
}
