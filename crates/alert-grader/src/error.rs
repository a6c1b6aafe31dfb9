//! Error types for the grader service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for grader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Grader service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected upload (missing file, bad extension, too large, unsafe name)
    #[error("{0}")]
    InvalidUpload(String),

    /// Job id that is not safe to embed in an object key
    #[error("Invalid job id: {0}")]
    InvalidJobId(String),

    /// Object store backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Object missing from a namespace
    #[error("Object not found: {namespace}/{key}")]
    ObjectNotFound { namespace: String, key: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Wraps another error with the operation that failed
    #[error("{context}: {source}")]
    Context {
        context: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an invalid upload error
    pub fn invalid_upload(message: impl Into<String>) -> Self {
        Self::InvalidUpload(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an object not found error
    pub fn not_found(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Prefix the error with the failed operation, keeping its status class
    pub fn context(self, context: &'static str) -> Self {
        Self::Context {
            context,
            source: Box::new(self),
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidUpload(_) | Error::InvalidJobId(_) => StatusCode::BAD_REQUEST,
            Error::Context { source, .. } => source.status_code(),
            Error::Config(_)
            | Error::Storage(_)
            | Error::ObjectNotFound { .. }
            | Error::Io(_)
            | Error::Json(_)
            | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        // Backend messages are echoed as-is
        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
