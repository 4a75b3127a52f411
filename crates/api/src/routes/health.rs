//! Health check endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Routes mounted under `/health`
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status, always "ok" while the process answers
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the process started
    pub uptime_secs: u64,
}

#[tracing::instrument(name = "GET /health", skip(state))]
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
