//! API routes for the grader server

pub mod listing;
pub mod result;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use crate::config::GraderConfig;
use crate::server::state::AppState;
use crate::types::response::{timestamp, HealthResponse};

/// Service name reported by the health check
pub const SERVICE_NAME: &str = "Alert Grader Backend API";

/// Build all API routes
pub fn api_routes(config: &GraderConfig) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness))
        // Upload - body limit sized from the file cap
        .route(
            "/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(config.upload.body_limit())),
        )
        .route("/result/:job_id", get(result::get_result))
        .route("/status/:job_id", get(result::get_status));

    if config.server.enable_listings {
        tracing::warn!("Object listings enabled at /api/jobs and /api/results");
        router
            .route("/jobs", get(listing::list_jobs))
            .route("/results", get(listing::list_results))
    } else {
        router
    }
}

/// GET /api/health
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: timestamp(Utc::now()),
        service: SERVICE_NAME.to_string(),
    })
}

/// GET /api/ready - 200 when the store answers its health check
async fn readiness(State(state): State<AppState>) -> StatusCode {
    if !state.is_ready() {
        return StatusCode::SERVICE_UNAVAILABLE;
    }
    match state.store().health_check().await {
        Ok(true) => StatusCode::OK,
        Ok(false) => StatusCode::SERVICE_UNAVAILABLE,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
