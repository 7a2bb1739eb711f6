use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;
use ttsq_core::error::CoreError;
use ttsq_core::job::{Job, JobId, JobStatus};

/// Per-status job totals, reported by `GET /health`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobCounts {
    pub pending: usize,
    pub in_progress: usize,
    pub done: usize,
    pub error: usize,
}

/// In-memory job records keyed by job id.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared between request handlers and the worker. Records live for the
/// lifetime of the process.
pub struct JobTable {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl JobTable {
    /// Create a new, empty table.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a freshly submitted job.
    ///
    /// Returns `Conflict` if a record with the same id already exists.
    pub async fn insert(&self, job: Job) -> Result<(), CoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(CoreError::Conflict(format!("job {} already exists", job.id)));
        }
        jobs.insert(job.id.clone(), job);
        Ok(())
    }

    /// Drop a record whose work item could not be enqueued.
    pub async fn remove(&self, job_id: &str) -> Option<Job> {
        self.jobs.write().await.remove(job_id)
    }

    /// Snapshot of a single job.
    pub async fn get(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().await.get(job_id).cloned()
    }

    /// Move a job to its next status.
    ///
    /// Returns the updated snapshot, `NotFound` for unknown ids, or
    /// `Conflict` for a backward / skipped transition.
    pub async fn transition(&self, job_id: &JobId, next: JobStatus) -> Result<Job, CoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(job_id).ok_or_else(|| CoreError::NotFound {
            entity: "Job",
            id: job_id.to_string(),
        })?;
        job.transition(next)?;
        Ok(job.clone())
    }

    /// Mark a job `in_progress`.
    pub async fn mark_in_progress(&self, job_id: &JobId) -> Result<Job, CoreError> {
        self.transition(job_id, JobStatus::InProgress).await
    }

    /// Mark a job `done`.
    pub async fn mark_done(&self, job_id: &JobId) -> Result<Job, CoreError> {
        self.transition(job_id, JobStatus::Done).await
    }

    /// Mark a job `error`, keeping `reason` on the record for diagnostics.
    pub async fn mark_failed(&self, job_id: &JobId, reason: &str) -> Result<Job, CoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(job_id).ok_or_else(|| CoreError::NotFound {
            entity: "Job",
            id: job_id.to_string(),
        })?;
        job.transition(JobStatus::Error)?;
        job.error_message = Some(reason.to_string());
        Ok(job.clone())
    }

    /// Number of records of each status.
    pub async fn counts(&self) -> JobCounts {
        let jobs = self.jobs.read().await;
        let mut counts = JobCounts::default();
        for job in jobs.values() {
            match job.status {
                JobStatus::Pending => counts.pending += 1,
                JobStatus::InProgress => counts.in_progress += 1,
                JobStatus::Done => counts.done += 1,
                JobStatus::Error => counts.error += 1,
            }
        }
        counts
    }

    /// Total number of records.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}
