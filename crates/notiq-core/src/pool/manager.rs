//! The worker pool and its lifecycle.
//!
//! This module defines the [`WorkerPool`] struct, which owns the bounded
//! job queue and a fixed set of worker tasks draining it concurrently. The
//! pool exposes three lifecycle operations: a one-shot [`start`], a
//! non-blocking [`submit`] that performs admission control, and a
//! [`shutdown`] that closes the queue and waits for every worker to drain
//! and exit.
//!
//! All workers receive jobs from the same MPMC channel; there is no
//! per-worker routing state and no other shared mutable state between
//! workers.
//!
//! [`start`]: WorkerPool::start
//! [`submit`]: WorkerPool::submit
//! [`shutdown`]: WorkerPool::shutdown

use crate::dispatch::HandlerRegistry;
use crate::error::{Error, Result};
use crate::job::Job;
use crate::pool::worker::worker_loop;
use crate::queue::JobQueue;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use tokio_util::task::TaskTracker;

/// Outcome of a non-blocking submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The job was placed on the queue. `job_id` echoes the submitted
    /// job's id so the gateway can acknowledge it to the caller.
    Accepted { job_id: String },
    /// The queue was at capacity, or the pool is not accepting work.
    /// Designed backpressure, not a fault: the caller should try again
    /// later.
    Rejected,
}

// Lifecycle states, stored in a single atomic. Transitions only ever move
// forward: Idle -> Started -> ShuttingDown -> Terminated.
const IDLE: u8 = 0;
const STARTED: u8 = 1;
const SHUTTING_DOWN: u8 = 2;
const TERMINATED: u8 = 3;

/// A fixed-size pool of asynchronous workers draining a bounded job queue.
///
/// The pool is constructed by the process's composition root and passed by
/// reference to whatever handles inbound requests; there is no global
/// instance. Between [`start`](WorkerPool::start) and the completion of
/// [`shutdown`](WorkerPool::shutdown), exactly `worker_count` execution
/// loops exist.
#[derive(Debug)]
pub struct WorkerPool {
    worker_count: usize,
    queue: JobQueue,
    registry: Arc<HandlerRegistry>,
    tracker: TaskTracker,
    state: AtomicU8,
}

impl WorkerPool {
    /// Constructs an idle pool owning a queue of the given capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `worker_count` or
    /// `queue_capacity` is zero.
    pub fn new(
        worker_count: usize,
        queue_capacity: usize,
        registry: HandlerRegistry,
    ) -> Result<Self> {
        if worker_count == 0 {
            return Err(Error::InvalidConfig {
                reason: "worker count must be greater than 0".into(),
            });
        }
        if queue_capacity == 0 {
            return Err(Error::InvalidConfig {
                reason: "queue capacity must be greater than 0".into(),
            });
        }

        Ok(Self {
            worker_count,
            queue: JobQueue::bounded(queue_capacity),
            registry: Arc::new(registry),
            tracker: TaskTracker::new(),
            state: AtomicU8::new(IDLE),
        })
    }

    /// Spawns exactly `worker_count` workers, each independently draining
    /// the shared queue. Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyStarted`] if the pool ever left the idle
    /// state before, including after a shutdown: a pool is started at most
    /// once.
    pub fn start(&self) -> Result<()> {
        self.state
            .compare_exchange(IDLE, STARTED, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::AlreadyStarted)?;

        for worker_id in 0..self.worker_count {
            self.tracker.spawn(worker_loop(
                worker_id,
                self.queue.clone(),
                Arc::clone(&self.registry),
            ));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("Worker pool started with {} workers", self.worker_count);

        Ok(())
    }

    /// Offers `job` to the queue without waiting.
    ///
    /// This is the sole admission-control surface: the job is accepted if
    /// there is free queue capacity and rejected otherwise. Outside the
    /// started state (before [`start`](WorkerPool::start), or once
    /// [`shutdown`](WorkerPool::shutdown) has begun) every submission is
    /// rejected. Never blocks the caller.
    pub fn submit(&self, job: Job) -> Submission {
        if self.state.load(Ordering::Acquire) != STARTED {
            return Submission::Rejected;
        }

        let job_id = job.id().to_owned();
        if self.queue.try_enqueue(job) {
            Submission::Accepted { job_id }
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!("Rejected job {job_id}: queue at capacity");
            Submission::Rejected
        }
    }

    /// Closes the queue and waits until every worker has drained the
    /// remaining jobs and exited.
    ///
    /// The first effective call runs the close-and-drain sequence exactly
    /// once; concurrent and later calls wait for the same completion, so
    /// repeated invocation during process teardown is safe. Already
    /// accepted jobs run to completion; nothing submitted after this point
    /// is ever executed. No timeout is imposed here; the surrounding
    /// process owns the deadline.
    pub async fn shutdown(&self) {
        if self
            .state
            .compare_exchange(STARTED, SHUTTING_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            #[cfg(feature = "tracing")]
            tracing::info!("Shutting down worker pool ({} jobs queued)", self.queue.len());

            self.queue.close();
            self.tracker.close();
        } else if self
            .state
            .compare_exchange(IDLE, SHUTTING_DOWN, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            // Never started: nothing to drain, but the queue still has to
            // refuse any further work.
            self.queue.close();
            self.tracker.close();
        }

        self.tracker.wait().await;
        self.state.store(TERMINATED, Ordering::Release);

        #[cfg(feature = "tracing")]
        tracing::info!("Worker pool shut down");
    }

    /// Number of workers this pool was configured with.
    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Number of jobs currently waiting in the queue.
    pub fn queued_jobs(&self) -> usize {
        self.queue.len()
    }

    /// Capacity of the underlying job queue.
    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }
}
