//! Object naming for job inputs and outputs
//!
//! A job id maps to exactly one key per namespace: `{id}.csv` for the raw
//! upload and `{id}.json` for the result. The input extension is fixed no
//! matter what format the client uploaded.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static JOB_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]{1,64}$").expect("valid job id pattern"));

/// Which side of the job an object belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Raw uploaded bytes
    Input,
    /// Produced JSON result
    Output,
}

impl ObjectKind {
    /// File extension used for keys of this kind
    pub fn extension(self) -> &'static str {
        match self {
            ObjectKind::Input => "csv",
            ObjectKind::Output => "json",
        }
    }

    /// Object key for a job id
    pub fn key_for(self, job_id: &str) -> String {
        format!("{}.{}", job_id, self.extension())
    }

    /// Extract the job id from a key of this kind, if the suffix matches
    pub fn job_id_from_key(self, key: &str) -> Option<&str> {
        key.strip_suffix(self.extension())
            .and_then(|rest| rest.strip_suffix('.'))
            .filter(|id| !id.is_empty())
    }
}

/// Reject job ids that are not safe to embed in an object key
pub fn validate_job_id(job_id: &str) -> Result<&str> {
    if JOB_ID_PATTERN.is_match(job_id) {
        Ok(job_id)
    } else {
        Err(Error::InvalidJobId(job_id.to_string()))
    }
}
