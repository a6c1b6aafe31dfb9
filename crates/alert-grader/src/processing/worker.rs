//! Background worker that writes result documents
//!
//! The worker drains the job channel and runs each job on its own task, so a
//! long delay for one upload never holds back another. Nothing waits on these
//! tasks; if the process exits first, the pending writes are lost.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::providers::ObjectStore;
use crate::types::ObjectKind;

use super::delay::ResultDelay;
use super::job_queue::{JobQueue, JobStatus, ResultJob};
use super::payload::derive_report;

/// Worker producing simulated results in the background
#[derive(Clone)]
pub struct ResultWorker {
    store: Arc<dyn ObjectStore>,
    job_queue: Arc<JobQueue>,
    output_namespace: String,
    delay: ResultDelay,
}

impl ResultWorker {
    /// Create a new result worker
    pub fn new(
        store: Arc<dyn ObjectStore>,
        job_queue: Arc<JobQueue>,
        output_namespace: impl Into<String>,
        delay: ResultDelay,
    ) -> Self {
        Self {
            store,
            job_queue,
            output_namespace: output_namespace.into(),
            delay,
        }
    }

    /// Start processing jobs from the queue
    pub async fn run(self, mut receiver: mpsc::Receiver<ResultJob>) {
        tracing::info!("Result worker started (delay: {:?})", self.delay);

        while let Some(job) = receiver.recv().await {
            let worker = self.clone();
            tokio::spawn(async move {
                worker.process(job).await;
            });
        }

        tracing::info!("Result worker stopped: job channel closed");
    }

    /// Wait, then write the result for one job
    async fn process(&self, job: ResultJob) {
        let job_id = job.id;
        let delay = self.delay.sample();
        self.job_queue.mark_waiting(job_id, delay);
        tracing::info!(
            "Job {} scheduled: result for '{}' in {:.1}s",
            job_id,
            job.filename,
            delay.as_secs_f64()
        );

        tokio::time::sleep(delay).await;

        match self.produce(&job).await {
            Ok(()) => {
                self.job_queue.update_status(job_id, JobStatus::Complete, None);
                tracing::info!(
                    "Job {} completed ({} still in flight)",
                    job_id,
                    self.job_queue.in_flight()
                );
            }
            Err(e) => {
                self.job_queue
                    .update_status(job_id, JobStatus::Failed, Some(e.to_string()));
                tracing::error!("Job {} failed: {}", job_id, e);
            }
        }
    }

    /// Derive and store the result document for a job
    pub async fn produce(&self, job: &ResultJob) -> Result<()> {
        let job_id = job.id.to_string();
        let key = ObjectKind::Output.key_for(&job_id);

        // Results are written at most once
        if self.store.exists(&self.output_namespace, &key).await? {
            tracing::warn!("Result {} already exists, not overwriting", key);
            return Ok(());
        }

        let report = derive_report(&job_id, &job.filename);
        let body = serde_json::to_vec_pretty(&report)?;
        self.store.put(&self.output_namespace, &key, &body).await?;

        tracing::debug!(
            "Wrote {}/{} ({} bytes) via {}",
            self.output_namespace,
            key,
            body.len(),
            self.store.name()
        );
        Ok(())
    }
}
