//! Core types for jobs, object naming, and API bodies

pub mod job;
pub mod object_key;
pub mod response;

pub use job::{resolve_state, JobState};
pub use object_key::ObjectKind;
