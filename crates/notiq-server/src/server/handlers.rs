//! Built-in notification handlers.
//!
//! Delivery is a stub: each handler logs the dispatch and returns. Real
//! transports slot in behind [`JobHandler`] without the queue or pool
//! changing shape.

use futures::FutureExt;
use futures::future::BoxFuture;
use notiq_core::{HandlerRegistry, Job, JobHandler, Result};

/// Logs the dispatch of one delivery channel's notifications.
pub struct LogDelivery {
    channel: &'static str,
}

impl LogDelivery {
    pub fn new(channel: &'static str) -> Self {
        Self { channel }
    }
}

impl JobHandler for LogDelivery {
    fn handle<'a>(&'a self, job: &'a Job) -> BoxFuture<'a, Result<()>> {
        async move {
            tracing::info!(
                "Delivering {} notification for job {} ({} payload bytes)",
                self.channel,
                job.id(),
                job.payload().len()
            );
            Ok(())
        }
        .boxed()
    }
}

/// Registry with the built-in delivery channels registered.
pub fn builtin_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.register("email", LogDelivery::new("email"));
    registry.register("sms", LogDelivery::new("sms"));
    registry.register("webhook", LogDelivery::new("webhook"));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_channels_are_registered() {
        let registry = builtin_registry();
        for kind in ["email", "sms", "webhook"] {
            assert!(registry.contains(kind));
        }
        assert!(!registry.contains("carrier-pigeon"));
    }
}
