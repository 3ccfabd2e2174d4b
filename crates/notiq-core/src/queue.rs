//! Bounded FIFO job queue shared between producers and workers.
//!
//! The queue is the single piece of mutable state shared across the pool.
//! It is backed by a bounded [`async_channel`] channel, which provides the
//! multi-producer/multi-consumer safety the contract requires and whose
//! close semantics match what the pool needs for shutdown: a closed
//! channel refuses new sends while already-queued jobs remain receivable
//! until drained.

use crate::job::Job;

/// A fixed-capacity FIFO queue of [`Job`]s.
///
/// Capacity is set once at construction and never resized. Producers offer
/// jobs with the non-blocking [`try_enqueue`](JobQueue::try_enqueue);
/// workers pull them with [`dequeue`](JobQueue::dequeue). Cloning is cheap
/// and every clone refers to the same underlying channel.
#[derive(Clone, Debug)]
pub struct JobQueue {
    tx: async_channel::Sender<Job>,
    rx: async_channel::Receiver<Job>,
    capacity: usize,
}

impl JobQueue {
    /// Creates a queue that holds at most `capacity` jobs.
    ///
    /// Callers validate `capacity > 0`; the pool rejects a zero capacity at
    /// construction.
    pub fn bounded(capacity: usize) -> Self {
        let (tx, rx) = async_channel::bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Attempts to place `job` at the tail without waiting.
    ///
    /// This is the admission-control decision point: when the queue is at
    /// capacity (or closed), the job is shed at the boundary and `false` is
    /// returned. The caller is never blocked on a worker.
    pub fn try_enqueue(&self, job: Job) -> bool {
        self.tx.try_send(job).is_ok()
    }

    /// Waits for the next job, in FIFO order relative to enqueue order.
    ///
    /// Resolves to `None` once the queue has been closed *and* fully
    /// drained, which is the signal for the calling worker to exit.
    pub async fn dequeue(&self) -> Option<Job> {
        self.rx.recv().await.ok()
    }

    /// Closes the queue: no further enqueue succeeds, while queued jobs
    /// stay available to [`dequeue`](JobQueue::dequeue) until drained.
    ///
    /// Idempotent. Returns `true` only for the call that actually closed
    /// the channel.
    pub fn close(&self) -> bool {
        self.tx.close()
    }

    /// Number of jobs currently waiting in the queue.
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    /// The fixed capacity this queue was constructed with.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn job(id: &str) -> Job {
        Job::new(id, "test", Bytes::new())
    }

    #[tokio::test]
    async fn dequeues_in_fifo_order() {
        let queue = JobQueue::bounded(8);
        for id in ["a", "b", "c", "d", "e"] {
            assert!(queue.try_enqueue(job(id)));
        }

        for id in ["a", "b", "c", "d", "e"] {
            let next = queue.dequeue().await.expect("job available");
            assert_eq!(next.id(), id);
        }
    }

    #[tokio::test]
    async fn rejects_at_capacity_until_drained() {
        let queue = JobQueue::bounded(2);
        assert!(queue.try_enqueue(job("a")));
        assert!(queue.try_enqueue(job("b")));
        assert!(!queue.try_enqueue(job("c")));

        let drained = queue.dequeue().await.expect("job available");
        assert_eq!(drained.id(), "a");

        assert!(queue.try_enqueue(job("c")));
        assert_eq!(queue.len(), 2);
    }

    #[tokio::test]
    async fn close_refuses_new_jobs_but_drains_queued_ones() {
        let queue = JobQueue::bounded(4);
        assert!(queue.try_enqueue(job("a")));
        assert!(queue.try_enqueue(job("b")));

        assert!(queue.close());
        assert!(queue.is_closed());
        assert!(!queue.try_enqueue(job("c")));

        assert_eq!(queue.dequeue().await.expect("queued").id(), "a");
        assert_eq!(queue.dequeue().await.expect("queued").id(), "b");
        assert!(queue.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let queue = JobQueue::bounded(1);
        assert!(queue.close());
        assert!(!queue.close());
        assert!(queue.dequeue().await.is_none());
    }
}
