//! Synthesis job records and their lifecycle.
//!
//! A job moves through `pending -> in_progress -> {done, error}` and never
//! backward. [`Job::transition`] enforces that ordering and stamps the
//! matching timestamps.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// JobId
// ---------------------------------------------------------------------------

/// Opaque job identifier handed to clients as `task_id`.
///
/// Generated ids are UUIDv7 strings: unique across concurrent submissions and
/// sortable by creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// Lets `HashMap<JobId, _>` be queried with a plain `&str`.
impl Borrow<str> for JobId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// JobStatus
// ---------------------------------------------------------------------------

/// Job execution status as reported by `GET /query_tts_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Done,
    Error,
}

impl JobStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::InProgress,
        JobStatus::Done,
        JobStatus::Error,
    ];

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }

    /// `true` for `done` and `error`.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    /// Whether moving from `self` to `next` is a legal forward step.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::InProgress)
                | (JobStatus::InProgress, JobStatus::Done)
                | (JobStatus::InProgress, JobStatus::Error)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// One text-to-speech request and its lifecycle state.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    /// Where the worker writes the synthesized audio.
    pub output_path: PathBuf,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    /// Failure detail kept for logs. Never returned to clients.
    #[serde(skip)]
    pub error_message: Option<String>,
}

impl Job {
    /// Create a new `pending` job.
    pub fn new(id: JobId, output_path: PathBuf) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            output_path,
            created_at: chrono::Utc::now(),
            started_at: None,
            finished_at: None,
            error_message: None,
        }
    }

    /// Advance the job to `next`.
    ///
    /// Returns `Conflict` for any transition other than
    /// `pending -> in_progress` or `in_progress -> done | error`.
    pub fn transition(&mut self, next: JobStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::Conflict(format!(
                "job {} cannot move from {} to {}",
                self.id, self.status, next
            )));
        }

        let now = chrono::Utc::now();
        match next {
            JobStatus::InProgress => self.started_at = Some(now),
            JobStatus::Done | JobStatus::Error => self.finished_at = Some(now),
            JobStatus::Pending => {}
        }
        self.status = next;
        Ok(())
    }

    /// Basename of the output file, used to build the download URL.
    pub fn output_filename(&self) -> Option<&str> {
        self.output_path.file_name().and_then(|name| name.to_str())
    }
}

// ---------------------------------------------------------------------------
// QueueEntry
// ---------------------------------------------------------------------------

/// A unit of pending work, consumed exactly once by the worker.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub job_id: JobId,
    pub text: String,
    pub output_path: PathBuf,
}

impl QueueEntry {
    pub fn new(job_id: JobId, text: impl Into<String>, output_path: impl AsRef<Path>) -> Self {
        Self {
            job_id,
            text: text.into(),
            output_path: output_path.as_ref().to_path_buf(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject empty submission text.
pub fn validate_text(text: &str) -> Result<(), CoreError> {
    if text.is_empty() {
        return Err(CoreError::Validation("Text must not be empty".into()));
    }
    Ok(())
}
