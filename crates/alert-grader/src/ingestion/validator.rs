//! Upload validation
//!
//! Checks run before anything is written, so a rejected upload never leaves
//! an input object behind.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::config::UploadConfig;
use crate::error::{Error, Result};

static SAFE_FILENAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._()\-]*$").expect("valid filename pattern")
});

/// An upload that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpload {
    /// Client-supplied filename
    pub filename: String,
    /// Lowercased extension, without the dot
    pub extension: String,
    pub size: usize,
}

/// Validate the filename and content of an uploaded file
pub fn validate_upload(
    config: &UploadConfig,
    filename: Option<&str>,
    data: &[u8],
) -> Result<ValidatedUpload> {
    let filename = filename.map(str::trim).unwrap_or("");
    if filename.is_empty() {
        return Err(Error::invalid_upload("No file selected"));
    }

    if filename.len() > config.max_filename_len {
        return Err(Error::invalid_upload(format!(
            "Filename too long: {} bytes (max {})",
            filename.len(),
            config.max_filename_len
        )));
    }

    if !SAFE_FILENAME.is_match(filename) || filename.contains("..") {
        return Err(Error::invalid_upload(format!(
            "Invalid filename '{}': only letters, digits, spaces, '.', '_', '-', '(' and ')' are allowed",
            filename
        )));
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if !config.allowed_extensions.iter().any(|allowed| *allowed == extension) {
        let allowed: Vec<String> = config
            .allowed_extensions
            .iter()
            .map(|e| format!(".{}", e))
            .collect();
        let shown = if extension.is_empty() {
            "(none)".to_string()
        } else {
            format!(".{}", extension)
        };
        return Err(Error::invalid_upload(format!(
            "File type not allowed: {} (allowed: {})",
            shown,
            allowed.join(", ")
        )));
    }

    if data.is_empty() {
        return Err(Error::invalid_upload("File is empty"));
    }

    if data.len() > config.max_file_size {
        return Err(Error::invalid_upload(format!(
            "File too large: {} bytes (max {} bytes)",
            data.len(),
            config.max_file_size
        )));
    }

    Ok(ValidatedUpload {
        filename: filename.to_string(),
        extension,
        size: data.len(),
    })
}
