//! Background TTS worker.
//!
//! A single long-lived Tokio task that takes one [`QueueEntry`] at a time
//! off the work queue and runs it through the [`Synthesizer`]. Jobs are
//! processed strictly in submission order; a failure only affects the job
//! that failed.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use ttsq_core::job::{JobStatus, QueueEntry};
use ttsq_core::synthesis::{ensure_output_written, SynthesisSettings, Synthesizer};

use crate::jobs::queue::WorkReceiver;
use crate::jobs::table::JobTable;

/// Sole consumer of the work queue.
pub struct TtsWorker {
    table: Arc<JobTable>,
    synthesizer: Arc<dyn Synthesizer>,
    settings: SynthesisSettings,
}

impl TtsWorker {
    pub fn new(
        table: Arc<JobTable>,
        synthesizer: Arc<dyn Synthesizer>,
        settings: SynthesisSettings,
    ) -> Self {
        Self {
            table,
            synthesizer,
            settings,
        }
    }

    /// Spawn the worker loop onto the Tokio runtime.
    pub fn spawn(self, rx: WorkReceiver, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(rx, cancel).await })
    }

    /// Run until the cancellation token fires or every queue sender is gone.
    ///
    /// Cancellation is only observed between jobs; a synthesis already in
    /// flight runs to completion.
    pub async fn run(&self, mut rx: WorkReceiver, cancel: CancellationToken) {
        tracing::info!("TTS worker started");

        loop {
            let entry = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!("TTS worker shutting down");
                    break;
                }
                next = rx.recv() => match next {
                    Some(entry) => entry,
                    None => {
                        tracing::info!("Work queue closed, TTS worker exiting");
                        break;
                    }
                },
            };

            self.process(entry).await;
        }
    }

    /// Run one job to a terminal status.
    ///
    /// Returns the status the job ended in, or `None` if it could not be
    /// started (unknown id or not `pending`).
    pub async fn process(&self, entry: QueueEntry) -> Option<JobStatus> {
        let job_id = entry.job_id;

        if let Err(e) = self.table.mark_in_progress(&job_id).await {
            tracing::warn!(job_id = %job_id, error = %e, "Skipping queue entry");
            return None;
        }

        tracing::info!(job_id = %job_id, chars = entry.text.chars().count(), "Synthesis started");

        let request = self.settings.request(&entry.text, &entry.output_path);
        let started = Instant::now();

        let outcome = match self.synthesizer.synthesize(&request).await {
            Ok(()) => ensure_output_written(&entry.output_path).await,
            Err(e) => Err(e),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let update = match outcome {
            Ok(()) => {
                tracing::info!(
                    job_id = %job_id,
                    elapsed_ms,
                    output = %entry.output_path.display(),
                    "Synthesis finished",
                );
                self.table.mark_done(&job_id).await
            }
            Err(e) => {
                tracing::error!(job_id = %job_id, elapsed_ms, error = %e, "Synthesis failed");
                self.table.mark_failed(&job_id, &e.to_string()).await
            }
        };

        match update {
            Ok(job) => Some(job.status),
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "Failed to record job outcome");
                None
            }
        }
    }
}
