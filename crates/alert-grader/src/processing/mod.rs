//! Background result production with a job queue and progress tracking

mod delay;
mod job_queue;
mod payload;
mod worker;

pub use delay::ResultDelay;
pub use job_queue::{JobEvent, JobProgress, JobQueue, JobStatus, ResultJob};
pub use payload::{derive_report, AlertSummary, AnalysisReport, GradingMetrics};
pub use worker::ResultWorker;
