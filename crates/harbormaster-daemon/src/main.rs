//! Harbormaster daemon - main entry point
//!
//! Reads configuration from the environment (and an optional `.env` file),
//! connects to the local Docker Engine and runs maintenance cycles until one
//! fails. Any failure exits the process with status 1 so a supervisor can
//! restart it.

use anyhow::Context;
use harbormaster_docker::{default_socket_path, DockerPruner};
use harbormaster_janitor::{Janitor, JanitorConfig, JanitorWorker, WorkerExit};
use std::process;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env before logging so RUST_LOG can come from it
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
    }

    if let Err(e) = run().await {
        tracing::error!("{:#}", e);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = JanitorConfig::from_env();
    let socket = config
        .docker_socket
        .clone()
        .unwrap_or_else(|| default_socket_path().to_string());

    tracing::info!("Running in mode: {}", config.mode.as_str());
    tracing::info!("Swarm-global execution: {}", config.swarm_global);
    tracing::info!("Maintenance interval: {} hour(s)", config.cleanup_interval_hours);
    tracing::info!("Unused volume retention: {} day(s)", config.volume_retention_days);
    tracing::info!("Remove build cache: {}", config.remove_build_cache);
    tracing::info!("Image prune scope: {:?}", config.image_prune_scope());
    tracing::info!("Dry run: {}", config.dry_run);
    tracing::info!("Using socket: {}", socket);

    let pruner = DockerPruner::connect(&socket)
        .await
        .context("Docker Engine is not available")?;

    // Every topology runs the same cycle; the mode is only reported
    tracing::info!("Running maintenance on {}", config.topology());

    let mut worker = JanitorWorker::new(Janitor::new(pruner, config))?;

    match worker.run(shutdown_signal()).await {
        WorkerExit::Shutdown => Ok(()),
        WorkerExit::Failed(e) => Err(e).context("Error during maintenance, stopping"),
    }
}

/// Completes on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
