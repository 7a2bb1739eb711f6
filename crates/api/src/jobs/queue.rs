use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use ttsq_core::error::CoreError;
use ttsq_core::job::QueueEntry;

/// Create the unbounded FIFO work queue.
///
/// The [`WorkQueue`] half is cloned into request state; the single
/// [`WorkReceiver`] is owned by the worker.
pub fn work_queue() -> (WorkQueue, WorkReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let depth = Arc::new(AtomicUsize::new(0));
    (
        WorkQueue {
            tx,
            depth: Arc::clone(&depth),
        },
        WorkReceiver { rx, depth },
    )
}

/// Producer half of the work queue.
#[derive(Clone)]
pub struct WorkQueue {
    tx: mpsc::UnboundedSender<QueueEntry>,
    depth: Arc<AtomicUsize>,
}

impl WorkQueue {
    /// Append an entry. Never blocks.
    ///
    /// Fails only when the worker has dropped its receiver.
    pub fn push(&self, entry: QueueEntry) -> Result<(), CoreError> {
        // Count before sending so the consumer never decrements below zero.
        self.depth.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(entry).is_err() {
            self.depth.fetch_sub(1, Ordering::SeqCst);
            return Err(CoreError::Internal("work queue is closed".into()));
        }
        Ok(())
    }

    /// Entries enqueued but not yet taken by the worker.
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    /// Whether the worker side is gone.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half of the work queue.
pub struct WorkReceiver {
    rx: mpsc::UnboundedReceiver<QueueEntry>,
    depth: Arc<AtomicUsize>,
}

impl WorkReceiver {
    /// Wait for the next entry.
    ///
    /// Returns `None` once every [`WorkQueue`] has been dropped and the
    /// queue is drained.
    pub async fn recv(&mut self) -> Option<QueueEntry> {
        let entry = self.rx.recv().await?;
        self.depth.fetch_sub(1, Ordering::SeqCst);
        Some(entry)
    }
}
