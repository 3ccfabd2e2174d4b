use anyhow::bail;
use clap::Parser;
use std::time::Duration;

/// Runtime configuration for the `notiq-server` binary.
///
/// These settings control the concurrency and buffering behavior of the
/// notification service. All values are parsed from CLI arguments or
/// environment variables, with defaults suitable for small deployments.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "notiq-server",
    version,
    about = "An HTTP service that queues fire-and-forget notification jobs"
)]
pub struct CliArgs {
    /// Number of worker tasks draining the job queue concurrently.
    ///
    /// Each worker pulls jobs off the shared queue and executes them to
    /// completion, independently of the others.
    ///
    /// Environment variable: `NUM_WORKERS`
    #[arg(long, env = "NUM_WORKERS", default_value_t = 5)]
    pub num_workers: usize,

    /// Maximum number of jobs that may wait in the queue.
    ///
    /// Once this many jobs are queued, further submissions are rejected
    /// with a "server busy" response until workers drain the backlog.
    /// Lower values shed load sooner; higher values absorb larger bursts
    /// at the cost of memory.
    ///
    /// Environment variable: `QUEUE_CAPACITY`
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = 10)]
    pub queue_capacity: usize,

    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:7090"))]
    pub server_addr: String,

    /// Seconds granted to in-flight HTTP requests after a termination
    /// signal, before the listener is torn down. Queued jobs are always
    /// drained fully afterwards, whatever this value.
    ///
    /// Environment variable: `SHUTDOWN_GRACE_SECS`
    #[arg(long, env = "SHUTDOWN_GRACE_SECS", default_value_t = 5)]
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub num_workers: usize,
    pub queue_capacity: usize,
    pub server_addr: String,
    pub shutdown_grace: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.num_workers == 0 {
            bail!("NUM_WORKERS must be greater than 0");
        }

        if args.queue_capacity == 0 {
            bail!("QUEUE_CAPACITY must be greater than 0");
        }

        Ok(Self {
            num_workers: args.num_workers,
            queue_capacity: args.queue_capacity,
            server_addr: args.server_addr,
            shutdown_grace: Duration::from_secs(args.shutdown_grace_secs),
        })
    }
}
