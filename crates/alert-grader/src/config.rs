//! Configuration for the grader service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::processing::ResultDelay;

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraderConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Object store configuration
    pub storage: StorageConfig,
    /// Upload validation limits
    pub upload: UploadConfig,
    /// Background result production
    pub processing: ProcessingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Debug mode (verbose logging)
    pub debug: bool,
    /// Enable CORS
    pub enable_cors: bool,
    /// Mount the `/api/jobs` and `/api/results` listings
    pub enable_listings: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            debug: false,
            enable_cors: true,
            enable_listings: false,
        }
    }
}

/// Object store backend selection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// In-process store, lost on restart
    #[default]
    Memory,
    /// Directory per namespace on the local filesystem
    Local,
    /// Google Cloud Storage, bucket per namespace
    Gcs,
}

impl FromStr for StoreBackend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "local" | "fs" => Ok(Self::Local),
            "gcs" | "gcp" => Ok(Self::Gcs),
            other => Err(Error::Config(format!(
                "Unknown store backend '{}' (expected memory, local or gcs)",
                other
            ))),
        }
    }
}

/// Object store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Backend provider
    pub backend: StoreBackend,
    /// Root directory (local) or service endpoint (gcs)
    pub endpoint: String,
    /// Namespace for raw uploads
    pub input_namespace: String,
    /// Namespace for produced results
    pub output_namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            endpoint: "./data".to_string(),
            input_namespace: "input-data".to_string(),
            output_namespace: "output-data".to_string(),
        }
    }
}

impl StorageConfig {
    /// Root directory for the local backend
    pub fn local_root(&self) -> PathBuf {
        PathBuf::from(&self.endpoint)
    }
}

/// Upload validation limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes (default: 10MB)
    pub max_file_size: usize,
    /// Accepted extensions, lowercase, without the dot
    pub allowed_extensions: Vec<String>,
    /// Maximum filename length in bytes
    pub max_filename_len: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024, // 10MB
            allowed_extensions: vec!["csv".to_string(), "xlsx".to_string(), "xls".to_string()],
            max_filename_len: 255,
        }
    }
}

impl UploadConfig {
    /// Request body limit for the upload route; leaves room for multipart framing
    pub fn body_limit(&self) -> usize {
        self.max_file_size + 64 * 1024
    }
}

/// Background result production configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Schedule the simulated producer for every upload
    pub simulate_results: bool,
    /// Delay before the result is written
    pub result_delay: ResultDelay,
    /// Capacity of the job channel
    pub queue_capacity: usize,
    /// How long a failed job's error stays queryable
    pub failed_job_ttl: Duration,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            simulate_results: true,
            result_delay: ResultDelay::Uniform {
                min: Duration::from_secs(120),
                max: Duration::from_secs(180),
            },
            queue_capacity: 1000,
            failed_job_ttl: Duration::from_secs(3600),
        }
    }
}

impl GraderConfig {
    /// Load configuration from the process environment (and `.env`, if present)
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let server = ServerConfig {
            host: lookup("HOST").unwrap_or(defaults.server.host),
            port: parse_var(&lookup, "PORT", defaults.server.port)?,
            debug: parse_flag(&lookup, "DEBUG", defaults.server.debug)?,
            enable_cors: defaults.server.enable_cors,
            enable_listings: parse_flag(&lookup, "ENABLE_LISTINGS", defaults.server.enable_listings)?,
        };

        let storage = StorageConfig {
            backend: parse_var(&lookup, "STORE_BACKEND", defaults.storage.backend)?,
            endpoint: lookup("STORE_ENDPOINT").unwrap_or(defaults.storage.endpoint),
            input_namespace: lookup("INPUT_NAMESPACE").unwrap_or(defaults.storage.input_namespace),
            output_namespace: lookup("OUTPUT_NAMESPACE")
                .unwrap_or(defaults.storage.output_namespace),
        };

        if storage.input_namespace == storage.output_namespace {
            return Err(Error::Config(
                "INPUT_NAMESPACE and OUTPUT_NAMESPACE must differ".to_string(),
            ));
        }

        let upload = UploadConfig {
            max_file_size: parse_var(&lookup, "MAX_UPLOAD_BYTES", defaults.upload.max_file_size)?,
            ..defaults.upload
        };

        let min = parse_var(&lookup, "RESULT_DELAY_MIN_SECS", 120u64)?;
        let max = parse_var(&lookup, "RESULT_DELAY_MAX_SECS", 180u64)?;
        if min > max {
            return Err(Error::Config(format!(
                "RESULT_DELAY_MIN_SECS ({}) exceeds RESULT_DELAY_MAX_SECS ({})",
                min, max
            )));
        }

        let processing = ProcessingConfig {
            simulate_results: parse_flag(
                &lookup,
                "SIMULATE_RESULTS",
                defaults.processing.simulate_results,
            )?,
            result_delay: ResultDelay::Uniform {
                min: Duration::from_secs(min),
                max: Duration::from_secs(max),
            },
            queue_capacity: defaults.processing.queue_capacity,
            failed_job_ttl: defaults.processing.failed_job_ttl,
        };

        Ok(Self {
            server,
            storage,
            upload,
            processing,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {}='{}': {}", name, raw, e))),
        _ => Ok(default),
    }
}

fn parse_flag<F>(lookup: &F, name: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if v.is_empty() => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(Error::Config(format!("Invalid {}='{}': expected a boolean", name, v))),
        },
    }
}
