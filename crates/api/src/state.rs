use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use ttsq_core::synthesis::Synthesizer;

use crate::config::ServerConfig;
use crate::engine::worker::TtsWorker;
use crate::jobs::queue::{work_queue, WorkQueue};
use crate::jobs::table::JobTable;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (audio directory, timeouts).
    pub config: Arc<ServerConfig>,
    /// Job records, shared with the worker.
    pub jobs: Arc<JobTable>,
    /// Producer half of the work queue.
    pub queue: WorkQueue,
}

impl AppState {
    /// Build the job table and work queue and spawn the worker that
    /// consumes it.
    ///
    /// Returns the state for the router and the worker's join handle;
    /// cancelling `cancel` stops the worker after its current job.
    pub fn start(
        config: ServerConfig,
        synthesizer: Arc<dyn Synthesizer>,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>) {
        let jobs = Arc::new(JobTable::new());
        let (queue, rx) = work_queue();

        let worker = TtsWorker::new(Arc::clone(&jobs), synthesizer, config.synthesis.settings());
        let handle = worker.spawn(rx, cancel);

        let state = Self {
            config: Arc::new(config),
            jobs,
            queue,
        };
        (state, handle)
    }
}
