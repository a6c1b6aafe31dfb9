//! Job lifecycle state
//!
//! A job has no record of its own. Its state is inferred from which of its
//! objects exist, refined by whatever this process remembers about the
//! background producer.

use serde::{Deserialize, Serialize};

use crate::processing::JobStatus;

/// Observable state of a job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Input stored, producer not started yet
    Submitted,
    /// Waiting for the output object to appear
    Pending,
    /// Output object exists
    Completed,
    /// The in-process producer gave up; no output will be written by it
    Failed,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Submitted => "submitted",
            JobState::Pending => "pending",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map object presence and tracked producer status to a job state.
///
/// The output object is the only completion witness, so it wins over anything
/// tracked in memory. `None` means the id is unknown to both the store and
/// this process. The result endpoint still reports such ids as pending.
pub fn resolve_state(
    input_present: bool,
    output_present: bool,
    tracked: Option<JobStatus>,
) -> Option<JobState> {
    if output_present {
        return Some(JobState::Completed);
    }

    match tracked {
        Some(JobStatus::Failed) => Some(JobState::Failed),
        Some(JobStatus::Queued) => Some(JobState::Submitted),
        // A producer that reported success without a visible output is not
        // trusted; keep waiting for the object.
        Some(JobStatus::Waiting) | Some(JobStatus::Complete) => Some(JobState::Pending),
        None if input_present => Some(JobState::Pending),
        None => None,
    }
}
