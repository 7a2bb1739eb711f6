//! Job table and work queue: the only state shared between request
//! handlers and the worker.

pub mod queue;
pub mod table;

use std::path::Path;

use ttsq_core::audio;
use ttsq_core::error::CoreError;
use ttsq_core::job::{validate_text, Job, JobId, QueueEntry};

use self::queue::WorkQueue;
use self::table::JobTable;

/// Register a new job and hand it to the worker.
///
/// Empty text is rejected before anything is recorded. If the queue is
/// closed the record is rolled back so no job is left stranded in
/// `pending`.
pub async fn submit(
    table: &JobTable,
    queue: &WorkQueue,
    audio_dir: &Path,
    text: String,
) -> Result<Job, CoreError> {
    validate_text(&text)?;

    let job_id = JobId::generate();
    let output_path = audio::output_path(audio_dir, &job_id);
    let job = Job::new(job_id.clone(), output_path.clone());

    table.insert(job.clone()).await?;

    if let Err(e) = queue.push(QueueEntry::new(job_id.clone(), text, &output_path)) {
        table.remove(job_id.as_str()).await;
        return Err(e);
    }

    Ok(job)
}
