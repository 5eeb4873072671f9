use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::state::AppState;

/// Health report; `mongoState` carries the store's readiness code
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    #[serde(rename = "mongoState")]
    pub store_state: u8,
}

/// Health check endpoint
///
/// Always answers 200; an unreachable store shows up as `Unhealthy`.
///
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connection = state.stats.connection_state().await;

    Json(HealthResponse {
        status: if connection.is_healthy() {
            "Healthy"
        } else {
            "Unhealthy"
        },
        store_state: connection.code(),
    })
}
