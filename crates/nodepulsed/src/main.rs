//! nodepulsed — the nodepulse daemon.
//!
//! Single binary that wires the subsystems together:
//! - Snapshot store (in memory, latest poll only)
//! - Poller + scheduler (upstream JSON-RPC)
//! - HTTP façade (status, health, debug)
//!
//! # Usage
//!
//! ```text
//! BASE_URL=https://status.example.com IGNORE_GROUPS=staging nodepulsed --port 8080
//! ```

mod cli;

use std::sync::Arc;

use clap::Parser;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use nodepulse_poller::{PollScheduler, Poller};
use nodepulse_state::SnapshotStore;

use crate::cli::Cli;

const DEFAULT_LOG_FILTER: &str = "info,nodepulse=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    run(cli).await
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.poller_config();
    info!(
        upstream = %config.rpc_endpoint(),
        interval_ms = cli.poll_interval_ms,
        ignore_groups = ?config.ignore_groups.labels(),
        api_key = config.api_key.is_some(),
        cookie = config.cookie.is_some(),
        "nodepulse starting"
    );

    // ── Snapshot store + poller ────────────────────────────────

    let store = SnapshotStore::new();
    let poller = Poller::new(&config, store.clone())
        .map_err(|e| anyhow::anyhow!("build upstream client: {e}"))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = PollScheduler::new(Arc::new(poller), config.poll_interval);
    let scheduler_handle = scheduler.spawn(shutdown_rx);

    // ── HTTP façade ────────────────────────────────────────────

    let router = nodepulse_api::build_router(store, cli.poll_interval_ms);
    let addr = cli.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("shutdown signal received");
            let _ = shutdown_tx.send(true);
        })
        .await?;

    if let Err(e) = scheduler_handle.await {
        error!(error = %e, "poll scheduler task failed");
    }

    info!("nodepulse stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c, shutting down");
    }
}
