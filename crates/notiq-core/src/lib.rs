#![doc = include_str!("../README.md")]

mod dispatch;
mod error;
mod job;
mod pool;
mod queue;

pub use dispatch::{HandlerRegistry, JobHandler};
pub use error::{Error, Result};
pub use job::Job;
pub use pool::manager::{Submission, WorkerPool};
pub use queue::JobQueue;
