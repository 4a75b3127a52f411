//! Location ping intake.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use pingfence_core::{CheckOutcome, LocationUpdate};
use pingfence_geo::{validate_latitude, validate_longitude};

use crate::error::ApiError;
use crate::state::AppState;

/// Routes mounted under `/api/v1/locations`
pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(record_location))
}

/// Run the proximity check for one ping.
///
/// Once the payload validates, the response is always 200: the decision,
/// including any collaborator failure, lives in the body. Clients ping
/// frequently and treat every answer as advisory.
#[tracing::instrument(name = "POST /api/v1/locations", skip(state, ping), fields(owner_id = %ping.owner_id))]
async fn record_location(
    State(state): State<AppState>,
    Json(ping): Json<LocationUpdate>,
) -> Result<Json<CheckOutcome>, ApiError> {
    validate_latitude(ping.latitude).map_err(|e| ApiError::validation(e.to_string()))?;
    validate_longitude(ping.longitude).map_err(|e| ApiError::validation(e.to_string()))?;

    Ok(Json(state.checker.check(&ping).await))
}
