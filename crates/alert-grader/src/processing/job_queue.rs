//! Job queue for background result production
//!
//! Progress lives in memory only. A restart forgets every tracked job; the
//! objects in the store remain the source of truth. Completed jobs are
//! dropped from the registry at once since their output object witnesses
//! completion; failed jobs are kept until `failed_ttl` expires.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

/// Producer status for a tracked job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Sitting in the channel
    Queued,
    /// Picked up, sleeping before the write
    Waiting,
    /// Output written
    Complete,
    /// Output could not be written
    Failed,
}

impl JobStatus {
    fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }
}

/// Progress information for a job
#[derive(Debug, Clone)]
pub struct JobProgress {
    pub job_id: Uuid,
    pub filename: String,
    pub status: JobStatus,
    pub scheduled_delay_ms: Option<u64>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobProgress {
    pub fn new(job_id: Uuid, filename: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            job_id,
            filename: filename.into(),
            status: JobStatus::Queued,
            scheduled_delay_ms: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A request to produce the result for one upload
#[derive(Debug, Clone)]
pub struct ResultJob {
    pub id: Uuid,
    /// Original client filename; drives the derived payload
    pub filename: String,
}

/// Terminal outcome of a job, broadcast to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    Completed { job_id: Uuid },
    Failed { job_id: Uuid, error: String },
}

impl JobEvent {
    pub fn job_id(&self) -> Uuid {
        match self {
            JobEvent::Completed { job_id } | JobEvent::Failed { job_id, .. } => *job_id,
        }
    }
}

/// Job queue for managing background result production
pub struct JobQueue {
    /// Tracked jobs with progress
    jobs: Arc<DashMap<Uuid, JobProgress>>,
    /// Channel for sending jobs to the worker
    sender: mpsc::Sender<ResultJob>,
    /// Jobs not yet in a terminal state
    in_flight: Arc<AtomicUsize>,
    /// Terminal outcomes
    events: broadcast::Sender<JobEvent>,
    /// How long failed jobs stay queryable
    failed_ttl: Duration,
}

impl JobQueue {
    /// Create a new job queue; the receiver goes to the worker
    pub fn new(capacity: usize, failed_ttl: Duration) -> (Self, mpsc::Receiver<ResultJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let (events, _) = broadcast::channel(capacity.max(16));

        let queue = Self {
            jobs: Arc::new(DashMap::new()),
            sender,
            in_flight: Arc::new(AtomicUsize::new(0)),
            events,
            failed_ttl,
        };

        (queue, receiver)
    }

    /// Submit a job for production
    pub async fn submit(&self, job: ResultJob) -> Uuid {
        let job_id = job.id;
        self.prune_failed();

        self.jobs
            .insert(job_id, JobProgress::new(job_id, job.filename.clone()));
        self.in_flight.fetch_add(1, Ordering::SeqCst);

        if let Err(e) = self.sender.send(job).await {
            tracing::error!("Failed to submit job {}: {}", job_id, e);
            self.update_status(job_id, JobStatus::Failed, Some(e.to_string()));
        }

        job_id
    }

    /// Subscribe to terminal job outcomes
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }

    /// Get job progress
    pub fn get_progress(&self, job_id: Uuid) -> Option<JobProgress> {
        self.prune_failed();
        self.jobs.get(&job_id).map(|p| p.clone())
    }

    /// Get tracked status, if any
    pub fn status_of(&self, job_id: Uuid) -> Option<JobStatus> {
        self.get_progress(job_id).map(|p| p.status)
    }

    /// Number of jobs held in the registry
    pub fn tracked(&self) -> usize {
        self.jobs.len()
    }

    /// Drop failed jobs older than the configured TTL
    pub fn prune_failed(&self) {
        let Ok(ttl) = chrono::Duration::from_std(self.failed_ttl) else {
            return;
        };
        let cutoff = Utc::now() - ttl;
        self.jobs
            .retain(|_, p| !(p.status == JobStatus::Failed && p.updated_at <= cutoff));
    }

    /// Get all tracked jobs
    pub fn list_jobs(&self) -> Vec<JobProgress> {
        self.jobs.iter().map(|e| e.value().clone()).collect()
    }

    /// Jobs not yet complete or failed
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Record that the worker picked the job up and how long it will wait
    pub fn mark_waiting(&self, job_id: Uuid, delay: Duration) {
        if let Some(mut progress) = self.jobs.get_mut(&job_id) {
            progress.status = JobStatus::Waiting;
            progress.scheduled_delay_ms = Some(delay.as_millis() as u64);
            progress.updated_at = Utc::now();
        }
    }

    /// Update job status; terminal states are final and broadcast once
    pub fn update_status(&self, job_id: Uuid, status: JobStatus, error: Option<String>) {
        let Some(mut progress) = self.jobs.get_mut(&job_id) else {
            return;
        };
        if progress.status.is_terminal() {
            return;
        }

        progress.status = status;
        progress.error = error.clone();
        progress.updated_at = Utc::now();
        drop(progress); // Release lock before notifying

        if status.is_terminal() {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let event = match status {
                JobStatus::Failed => JobEvent::Failed {
                    job_id,
                    error: error.unwrap_or_default(),
                },
                _ => {
                    self.jobs.remove(&job_id);
                    JobEvent::Completed { job_id }
                }
            };
            // No subscribers is fine
            let _ = self.events.send(event);
        }
    }
}
