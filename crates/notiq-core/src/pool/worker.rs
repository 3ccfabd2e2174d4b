//! The per-worker execution loop.

use crate::dispatch::HandlerRegistry;
use crate::queue::JobQueue;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Execution loop for a single worker task.
///
/// Pulls jobs off the shared queue in FIFO order and dispatches each one
/// through the handler registry until the queue is closed and drained.
/// Execution is fire-and-forget: no result flows back to the submitter.
///
/// A failing handler is reported and the loop moves on to the next job.
/// The dispatch call runs inside a `catch_unwind` boundary so that even a
/// panicking handler is contained to the job that triggered it; a single
/// bad job never takes the worker down with it.
pub(crate) async fn worker_loop(
    _worker_id: usize,
    queue: JobQueue,
    registry: Arc<HandlerRegistry>,
) {
    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} started");

    while let Some(job) = queue.dequeue().await {
        match AssertUnwindSafe(registry.dispatch(&job)).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(_e)) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Worker {_worker_id} failed job {}: {_e}", job.id());
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Worker {_worker_id} caught panic in job {}", job.id());
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::trace!("Worker {_worker_id} stopped");
}
