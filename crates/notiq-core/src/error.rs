//! Error types for the notification dispatch core.
//!
//! This module defines the central `Error` enum, which captures the
//! reportable error cases within the worker pool. Admission rejection is
//! deliberately *not* represented here: a full queue is a designed
//! backpressure outcome, surfaced through
//! [`Submission::Rejected`](crate::Submission), never as a fault.
//!
//! ## Error Cases
//! - `InvalidConfig`: The pool was constructed with unusable parameters.
//! - `AlreadyStarted`: The pool's one-shot `start` was called again.
//! - `UnknownKind`: A job carried a kind with no registered handler.
//! - `Execution`: A handler reported a failure while running a job.

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the notification dispatch core.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// The pool was constructed with a zero worker count or queue capacity.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// `start` was called on a pool that already left the idle state.
    #[error("Worker pool already started")]
    AlreadyStarted,

    /// A job carried a kind with no registered handler.
    #[error("No handler registered for job kind '{kind}'")]
    UnknownKind { kind: String },

    /// A handler reported a failure while executing a job. Contained to
    /// that job; the worker loop keeps running.
    #[error("Job execution failed: {context}")]
    Execution { context: String },
}
