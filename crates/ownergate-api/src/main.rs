//! Ownergate Server Binary
//!
//! News, comments and personal notes behind owner-based access control.
//!
//! # Usage
//!
//! ```bash
//! # With config file
//! ownergate --config config.yaml
//!
//! # With environment variables only
//! OWNERGATE_SERVER__PORT=9000 ownergate
//! ```

use std::net::SocketAddr;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use ownergate_api::http::{create_router_with_observability, AppState};
use ownergate_api::observability::{init_logging, init_metrics, LoggingConfig};
use ownergate_server::ServerConfig;
use ownergate_storage::MemoryDataStore;

/// Ownergate - news and notes server with owner-only access
#[derive(Parser, Debug)]
#[command(name = "ownergate")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = if let Some(config_path) = args.config {
        ServerConfig::load(&config_path)?
    } else {
        ServerConfig::from_env()?
    };

    init_logging(LoggingConfig::from(&config.logging))?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting ownergate server");

    let metrics_state = if config.metrics.enabled {
        let state = init_metrics()?;
        info!("Metrics enabled at /metrics");
        Some(state)
    } else {
        info!("Metrics disabled");
        None
    };

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Only the memory backend passes config validation.
    info!(backend = %config.storage.backend, "Using in-memory storage backend");
    let storage = MemoryDataStore::new_shared();

    let state = AppState::with_config(storage, &config);
    let router = create_router_with_observability(state, metrics_state);

    run_http_server(router, addr).await
}

/// Run the HTTP server until a shutdown signal arrives.
async fn run_http_server(router: axum::Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
///
/// A handler that fails to install is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
