//! The immutable description of one unit of work.

use bytes::Bytes;

/// A single fire-and-forget unit of work.
///
/// A `Job` is built by the submission gateway once per accepted request:
/// the gateway assigns the `id`, names the `kind` of work, and carries the
/// request body along as an opaque `payload`. The payload is never
/// inspected by the queue or the pool; only the handler registered for
/// `kind` gives it meaning.
///
/// Jobs are immutable after construction and consumed exactly once by
/// exactly one worker. No record of a job survives its execution.
#[derive(Debug, Clone)]
pub struct Job {
    id: String,
    kind: String,
    payload: Bytes,
}

impl Job {
    pub fn new(id: impl Into<String>, kind: impl Into<String>, payload: Bytes) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            payload,
        }
    }

    /// Unique per submission, assigned by the gateway at admission time.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Discriminator used to resolve the handler that executes this job.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Opaque request data, interpreted only by the resolved handler.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}
