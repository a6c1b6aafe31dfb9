//! Application state for the grader server

use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::GraderConfig;
use crate::error::Result;
use crate::processing::{JobProgress, JobQueue, ResultWorker};
use crate::providers::{build_object_store, ObjectStore};
use crate::types::{resolve_state, JobState, ObjectKind};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: GraderConfig,
    /// Object store holding inputs and outputs
    store: Arc<dyn ObjectStore>,
    /// Job queue feeding the result worker
    job_queue: Arc<JobQueue>,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create state with the store backend named in the configuration
    pub async fn new(config: GraderConfig) -> Result<Self> {
        tracing::info!(
            "Initializing grader state (backend: {:?})...",
            config.storage.backend
        );
        let store = build_object_store(&config.storage).await?;
        Ok(Self::with_store(config, store))
    }

    /// Create state around an existing store and start the result worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_store(config: GraderConfig, store: Arc<dyn ObjectStore>) -> Self {
        let (job_queue, receiver) = JobQueue::new(
            config.processing.queue_capacity,
            config.processing.failed_job_ttl,
        );
        let job_queue = Arc::new(job_queue);

        let worker = ResultWorker::new(
            Arc::clone(&store),
            Arc::clone(&job_queue),
            config.storage.output_namespace.clone(),
            config.processing.result_delay.clone(),
        );
        tokio::spawn(async move {
            worker.run(receiver).await;
        });

        tracing::info!(
            "Object store '{}' ready (input: {}, output: {}, simulated results: {})",
            store.name(),
            config.storage.input_namespace,
            config.storage.output_namespace,
            config.processing.simulate_results
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                job_queue,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &GraderConfig {
        &self.inner.config
    }

    /// Get object store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.inner.store
    }

    /// Get job queue
    pub fn job_queue(&self) -> &Arc<JobQueue> {
        &self.inner.job_queue
    }

    pub fn input_namespace(&self) -> &str {
        &self.inner.config.storage.input_namespace
    }

    pub fn output_namespace(&self) -> &str {
        &self.inner.config.storage.output_namespace
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }

    /// Tracked producer progress for a job id, if this process knows it
    pub fn progress(&self, job_id: &str) -> Option<JobProgress> {
        Uuid::parse_str(job_id)
            .ok()
            .and_then(|id| self.inner.job_queue.get_progress(id))
    }

    /// Resolve the state of a job from its objects and tracked progress.
    ///
    /// `None` means neither the store nor this process knows the id.
    pub async fn lookup_state(&self, job_id: &str) -> Result<Option<JobState>> {
        let store = self.store();
        let output_present = store
            .exists(self.output_namespace(), &ObjectKind::Output.key_for(job_id))
            .await?;
        let input_present = if output_present {
            true
        } else {
            store
                .exists(self.input_namespace(), &ObjectKind::Input.key_for(job_id))
                .await?
        };
        let tracked = self.progress(job_id).map(|p| p.status);

        Ok(resolve_state(input_present, output_present, tracked))
    }
}
