//! Object listings for inputs and outputs
//!
//! Only mounted when listings are enabled in the configuration.

use axum::{extract::State, Json};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{
    response::{timestamp, JobListResponse, JobListing, ResultListResponse, ResultListing},
    ObjectKind,
};

/// GET /api/jobs - Uploaded inputs
pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<JobListResponse>> {
    let objects = state
        .store()
        .list(state.input_namespace())
        .await
        .map_err(|e| e.context("Failed to list jobs"))?;

    let jobs = objects
        .into_iter()
        .filter_map(|obj| {
            let job_id = ObjectKind::Input.job_id_from_key(&obj.key)?.to_string();
            Some(JobListing {
                job_id,
                upload_time: timestamp(obj.last_modified),
                size: obj.size,
                filename: obj.key,
            })
        })
        .collect();

    Ok(Json(JobListResponse { jobs }))
}

/// GET /api/results - Produced results
pub async fn list_results(State(state): State<AppState>) -> Result<Json<ResultListResponse>> {
    let objects = state
        .store()
        .list(state.output_namespace())
        .await
        .map_err(|e| e.context("Failed to list results"))?;

    let results = objects
        .into_iter()
        .filter_map(|obj| {
            let job_id = ObjectKind::Output.job_id_from_key(&obj.key)?.to_string();
            Some(ResultListing {
                job_id,
                created_time: timestamp(obj.last_modified),
                size: obj.size,
                filename: obj.key,
            })
        })
        .collect();

    Ok(Json(ResultListResponse { results }))
}
