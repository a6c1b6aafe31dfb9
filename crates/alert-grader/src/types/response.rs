//! Response bodies for the HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// GET /api/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
}

/// POST /api/upload (201)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub job_id: String,
    /// Storage key of the input object
    pub filename: String,
    /// Name the client uploaded the file as
    pub original_filename: String,
    pub message: String,
    pub upload_time: String,
}

/// Body returned while no output object exists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingResponse {
    pub status: String,
}

impl PendingResponse {
    pub fn new() -> Self {
        Self {
            status: "pending".to_string(),
        }
    }
}

impl Default for PendingResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// GET /api/status/:job_id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    /// `submitted`, `pending`, `completed`, `failed`, or `unknown`
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Fields below are present only while this process tracks the job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Entry of GET /api/jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub job_id: String,
    pub filename: String,
    pub upload_time: String,
    pub size: u64,
}

/// GET /api/jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobListing>,
}

/// Entry of GET /api/results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultListing {
    pub job_id: String,
    pub filename: String,
    pub created_time: String,
    pub size: u64,
}

/// GET /api/results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultListResponse {
    pub results: Vec<ResultListing>,
}

/// ISO-8601 timestamp used across responses
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}
