#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use notiq_core::WorkerPool;
use server::config::{CliArgs, ServerConfig};
use server::telemetry::init_telemetry;
use server::{gateway, handlers};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    init_telemetry();

    let pool = Arc::new(WorkerPool::new(
        config.num_workers,
        config.queue_capacity,
        handlers::builtin_registry(),
    )?);
    pool.start()?;
    tracing::info!(
        "Worker pool started with {} workers, queue capacity {}",
        pool.worker_count(),
        pool.queue_capacity()
    );

    let listener = TcpListener::bind(&config.server_addr).await?;
    tracing::info!("Listening on {}", config.server_addr);

    let app = gateway::router(Arc::clone(&pool));
    let shutdown_token = CancellationToken::new();
    let listener_token = shutdown_token.clone();
    let mut serve = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { listener_token.cancelled().await })
            .await
    });

    shutdown_signal().await;

    // Phase 1: stop accepting new requests. In-flight connections get the
    // configured grace period to finish before the listener task is torn
    // down.
    tracing::info!("Shutdown signal received, stopping listener");
    shutdown_token.cancel();
    match timeout(config.shutdown_grace, &mut serve).await {
        Ok(res) => res??,
        Err(_) => {
            tracing::warn!(
                "Listener drain exceeded {:?}, aborting in-flight requests",
                config.shutdown_grace
            );
            serve.abort();
        }
    }

    // Phase 2: drain the pool. The queue closes immediately, so nothing
    // submitted from here on is executed, while already accepted jobs run
    // to completion.
    tracing::info!("Finishing pending jobs");
    pool.shutdown().await;

    tracing::info!("Server exiting");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}
