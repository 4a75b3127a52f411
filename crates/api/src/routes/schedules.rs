//! Schedule CRUD endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use pingfence_core::{Schedule, ScheduleDraft, ScheduleUpdate};
use pingfence_geo::{validate_latitude, validate_longitude};

use crate::error::ApiError;
use crate::state::AppState;

/// Routes mounted under `/api/v1/schedules`
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_schedule))
        .route("/user/{owner_id}", get(list_schedules_for_owner))
        .route(
            "/{id}",
            get(get_schedule)
                .put(update_schedule)
                .delete(delete_schedule),
        )
}

#[tracing::instrument(name = "POST /api/v1/schedules", skip(state, draft), fields(owner_id = %draft.owner_id))]
async fn create_schedule(
    State(state): State<AppState>,
    Json(draft): Json<ScheduleDraft>,
) -> Result<(StatusCode, Json<Schedule>), ApiError> {
    validate_latitude(draft.latitude).map_err(|e| ApiError::validation(e.to_string()))?;
    validate_longitude(draft.longitude).map_err(|e| ApiError::validation(e.to_string()))?;

    let created = state
        .schedules
        .create(draft)
        .await
        .map_err(|e| ApiError::internal("Could not create schedule", e))?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[tracing::instrument(name = "GET /api/v1/schedules/user/{owner_id}", skip(state))]
async fn list_schedules_for_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Vec<Schedule>>, ApiError> {
    Ok(Json(state.schedules.list_for_owner(&owner_id).await?))
}

#[tracing::instrument(name = "GET /api/v1/schedules/{id}", skip(state))]
async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Schedule>, ApiError> {
    let schedule = state
        .schedules
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Schedule not found"))?;
    Ok(Json(schedule))
}

#[tracing::instrument(name = "PUT /api/v1/schedules/{id}", skip(state, patch))]
async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ScheduleUpdate>,
) -> Result<Json<Schedule>, ApiError> {
    if let Some(latitude) = patch.latitude {
        validate_latitude(latitude).map_err(|e| ApiError::validation(e.to_string()))?;
    }
    if let Some(longitude) = patch.longitude {
        validate_longitude(longitude).map_err(|e| ApiError::validation(e.to_string()))?;
    }

    let updated = state
        .schedules
        .update(&id, patch)
        .await?
        .ok_or_else(|| ApiError::not_found("Schedule not found or no update performed"))?;
    Ok(Json(updated))
}

#[tracing::instrument(name = "DELETE /api/v1/schedules/{id}", skip(state))]
async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.schedules.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(
            "Schedule not found or could not be deleted",
        ))
    }
}
