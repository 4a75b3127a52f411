//! HTTP surface for the Pingfence backend.
//!
//! Thin layer: every handler validates, delegates to an injected
//! collaborator and maps the result onto a status code and JSON body.
//! The interesting decisions live in `pingfence-core`.
//!
//! Routes:
//!
//! - `GET /` service banner
//! - `GET /health` liveness and build info
//! - `POST /api/v1/locations` location ping intake
//! - `POST /api/v1/schedules` create
//! - `GET /api/v1/schedules/user/{owner_id}` list by owner
//! - `GET|PUT|DELETE /api/v1/schedules/{id}` single-record CRUD
//!
//! The locations endpoint answers 200 for every validated ping; whether
//! a notification went out is carried in the body, never in the status.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::{AppState, State};

/// Service banner payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerResponse {
    /// Greeting line identifying the service
    pub message: String,
}

/// Build the full router over the given state.
pub fn construct_router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/locations", routes::locations::routes())
        .nest("/schedules", routes::schedules::routes());

    Router::new()
        .route("/", get(banner))
        .nest("/health", routes::health::routes())
        .nest("/api/v1", api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[tracing::instrument(name = "GET /")]
async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Welcome to Pingfence API".to_string(),
    })
}
