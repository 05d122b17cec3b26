//! The job queue: an explicit message-passing channel between the
//! submission handlers (many producers) and the worker (sole
//! consumer).
//!
//! Backed by an unbounded `tokio::mpsc` channel: `enqueue` never
//! blocks, never drops, never reorders; `recv` awaits in FIFO
//! order. The depth counter exists only for informational
//! reporting (queue position, queue status endpoint) and is
//! deliberately approximate under concurrency.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use vocalis_core::types::JobId;

/// The worker side of the channel was dropped; the service is
/// shutting down and no new jobs can be accepted.
#[derive(Debug, thiserror::Error)]
#[error("Job queue is closed")]
pub struct QueueClosed;

/// Producer half, cloned into every API handler via app state.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::UnboundedSender<JobId>,
    depth: Arc<AtomicUsize>,
}

/// Consumer half, owned by exactly one worker.
pub struct JobReceiver {
    rx: mpsc::UnboundedReceiver<JobId>,
    depth: Arc<AtomicUsize>,
}

/// Create a connected producer/consumer pair.
pub fn job_queue() -> (JobQueue, JobReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    let depth = Arc::new(AtomicUsize::new(0));
    (
        JobQueue {
            tx,
            depth: Arc::clone(&depth),
        },
        JobReceiver { rx, depth },
    )
}

impl JobQueue {
    /// Append a job reference to the tail of the queue.
    pub fn enqueue(&self, job_id: JobId) -> Result<(), QueueClosed> {
        // Count first so a submitter polling immediately after
        // enqueue sees a depth of at least one.
        self.depth.fetch_add(1, Ordering::SeqCst);
        if self.tx.send(job_id).is_err() {
            self.depth.fetch_sub(1, Ordering::SeqCst);
            return Err(QueueClosed);
        }
        Ok(())
    }

    /// Approximate number of pending (not-yet-dequeued) jobs.
    pub fn len(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobReceiver {
    /// Await the next job reference, FIFO. Returns `None` when all
    /// producers are gone.
    pub async fn recv(&mut self) -> Option<JobId> {
        let job_id = self.rx.recv().await;
        if job_id.is_some() {
            let _ = self
                .depth
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| d.checked_sub(1));
        }
        job_id
    }
}
