//! Result polling and job state endpoints

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{
    object_key::validate_job_id,
    response::{timestamp, JobStatusResponse, PendingResponse},
    ObjectKind,
};

/// GET /api/result/:job_id - Stored result, or `{"status":"pending"}`
///
/// Unknown ids also come back as pending; use `/api/status/:job_id` to tell
/// them apart.
pub async fn get_result(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Response> {
    let job_id = validate_job_id(&job_id)?;

    match fetch_result(&state, job_id)
        .await
        .map_err(|e| e.context("Failed to get result"))?
    {
        Some(document) => Ok(Json(document).into_response()),
        None => Ok(Json(PendingResponse::new()).into_response()),
    }
}

async fn fetch_result(state: &AppState, job_id: &str) -> Result<Option<serde_json::Value>> {
    let namespace = state.output_namespace();
    let key = ObjectKind::Output.key_for(job_id);

    if !state.store().exists(namespace, &key).await? {
        return Ok(None);
    }

    let raw = match state.store().get(namespace, &key).await {
        Ok(raw) => raw,
        Err(Error::ObjectNotFound { .. }) => return Ok(None),
        Err(e) => return Err(e),
    };

    let document = serde_json::from_slice(&raw)?;
    Ok(Some(document))
}

/// GET /api/status/:job_id - Explicit job state
pub async fn get_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusResponse>> {
    let job_id = validate_job_id(&job_id)?;

    let job_state = state
        .lookup_state(job_id)
        .await
        .map_err(|e| e.context("Failed to get status"))?;

    let progress = state.progress(job_id);

    Ok(Json(JobStatusResponse {
        job_id: job_id.to_string(),
        state: job_state
            .map(|s| s.as_str())
            .unwrap_or("unknown")
            .to_string(),
        error: progress.as_ref().and_then(|p| p.error.clone()),
        original_filename: progress.as_ref().map(|p| p.filename.clone()),
        scheduled_delay_ms: progress.as_ref().and_then(|p| p.scheduled_delay_ms),
        submitted_at: progress.as_ref().map(|p| timestamp(p.created_at)),
        updated_at: progress.as_ref().map(|p| timestamp(p.updated_at)),
    }))
}
