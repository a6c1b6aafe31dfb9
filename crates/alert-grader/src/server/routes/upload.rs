//! File upload endpoint

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::validate_upload;
use crate::processing::ResultJob;
use crate::server::state::AppState;
use crate::types::{
    response::{timestamp, UploadResponse},
    ObjectKind,
};

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

/// POST /api/upload - Store a file and schedule its result
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut upload: Option<(Option<String>, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        Error::invalid_upload(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::invalid_upload(format!("Failed to read file: {}", e)))?;
        upload = Some((filename, data));
        break;
    }

    let Some((filename, data)) = upload else {
        return Err(Error::invalid_upload("No file provided"));
    };

    let validated = validate_upload(&state.config().upload, filename.as_deref(), &data)?;

    let job_id = Uuid::new_v4();
    let key = ObjectKind::Input.key_for(&job_id.to_string());

    state
        .store()
        .put(state.input_namespace(), &key, &data)
        .await
        .map_err(|e| e.context("Failed to upload file"))?;

    tracing::info!(
        "File uploaded: {} as {}/{} ({} bytes)",
        validated.filename,
        state.input_namespace(),
        key,
        validated.size
    );

    if state.config().processing.simulate_results {
        state
            .job_queue()
            .submit(ResultJob {
                id: job_id,
                filename: validated.filename.clone(),
            })
            .await;
    }

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            job_id: job_id.to_string(),
            filename: key,
            original_filename: validated.filename,
            message: "File uploaded successfully".to_string(),
            upload_time: timestamp(Utc::now()),
        }),
    ))
}
