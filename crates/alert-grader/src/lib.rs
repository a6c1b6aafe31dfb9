//! alert-grader: upload gateway and result polling over a namespaced object store
//!
//! Uploads are stored under a generated job id in an input namespace. A result
//! document later appears under the same id in an output namespace, either
//! written by an external producer or by the built-in simulated worker.
//! Clients poll for it; the presence of the output object is the only
//! completion signal.

pub mod config;
pub mod error;
pub mod ingestion;
pub mod processing;
pub mod providers;
pub mod server;
pub mod types;

pub use config::GraderConfig;
pub use error::{Error, Result};
pub use types::{
    job::{resolve_state, JobState},
    object_key::ObjectKind,
};
