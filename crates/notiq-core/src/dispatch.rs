//! Capability-set dispatch from job kind to handler.
//!
//! Execution logic is resolved through an explicit mapping from a job's
//! `kind` to a registered [`JobHandler`], rather than by inspecting the
//! payload at runtime. New kinds of work plug in by registering a handler;
//! the queue and pool never change.

use crate::error::{Error, Result};
use crate::job::Job;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Executes jobs of a single kind.
///
/// Implementations return a boxed future so the registry can hold them as
/// trait objects. Handlers run on worker tasks and must be `Send + Sync`;
/// a returned error is contained to the job that produced it.
pub trait JobHandler: Send + Sync {
    fn handle<'a>(&'a self, job: &'a Job) -> BoxFuture<'a, Result<()>>;
}

/// Mapping from job kind to the handler that executes it.
///
/// Built once at startup by the composition root and shared read-only with
/// every worker. Registration after the pool has started is intentionally
/// not supported.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for jobs of the given kind, replacing any
    /// previous registration for that kind.
    pub fn register<H>(&mut self, kind: impl Into<String>, handler: H)
    where
        H: JobHandler + 'static,
    {
        self.handlers.insert(kind.into(), Arc::new(handler));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.handlers.contains_key(kind)
    }

    /// Runs the handler registered for `job`'s kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownKind`] when no handler is registered for the
    /// kind, or the handler's own error. Either way the failure belongs to
    /// this job alone.
    pub async fn dispatch(&self, job: &Job) -> Result<()> {
        match self.handlers.get(job.kind()) {
            Some(handler) => handler.handle(job).await,
            None => Err(Error::UnknownKind {
                kind: job.kind().to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        hits: Arc<AtomicUsize>,
    }

    impl JobHandler for Counting {
        fn handle<'a>(&'a self, _job: &'a Job) -> BoxFuture<'a, Result<()>> {
            async move {
                self.hits.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn routes_to_handler_by_kind() {
        let email_hits = Arc::new(AtomicUsize::new(0));
        let sms_hits = Arc::new(AtomicUsize::new(0));

        let mut registry = HandlerRegistry::new();
        registry.register(
            "email",
            Counting {
                hits: Arc::clone(&email_hits),
            },
        );
        registry.register(
            "sms",
            Counting {
                hits: Arc::clone(&sms_hits),
            },
        );

        let job = Job::new("1", "email", Bytes::new());
        registry.dispatch(&job).await.expect("handler registered");

        assert_eq!(email_hits.load(Ordering::SeqCst), 1);
        assert_eq!(sms_hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_kind_is_an_error() {
        let registry = HandlerRegistry::new();
        let job = Job::new("1", "carrier-pigeon", Bytes::new());

        let err = registry.dispatch(&job).await.expect_err("no handler");
        assert!(matches!(err, Error::UnknownKind { kind } if kind == "carrier-pigeon"));
    }
}
