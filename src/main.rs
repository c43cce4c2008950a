//! coleta-poc - collection point registration backend
//!
//! Serves the user list, the waste item catalog, and collection point
//! creation over HTTP.
//!
//! Module structure:
//! - `domain/` - Core business types (NewPoint, CatalogItem, Coordinates)
//! - `io/` - External interfaces (HTTP API, IBGE client, geolocation)
//! - `services/` - Business logic (registration form state machine)
//! - `infra/` - Infrastructure (Config, Metrics)

use clap::Parser;
use coleta_poc::infra::{Config, Metrics};
use coleta_poc::io::server::AppState;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// coleta-poc - Collection point registration backend
#[derive(Parser, Debug)]
#[command(name = "coleta-poc", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "config/dev.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Default: INFO, use RUST_LOG=debug for full event visibility
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!(git_hash = env!("GIT_HASH"), "coleta-poc starting");

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    info!(
        config_file = %config.config_file(),
        bind_address = %config.bind_address(),
        port = %config.port(),
        public_url = %config.public_url(),
        ibge_base_url = %config.ibge_base_url(),
        metrics_interval_secs = %config.metrics_interval_secs(),
        "config_loaded"
    );

    // Create shutdown signal
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Shared request state
    let metrics = Arc::new(Metrics::new());
    let state = Arc::new(AppState::new(metrics.clone(), config.public_url().to_string()));

    // Start periodic metrics reporter
    let metrics_interval = config.metrics_interval_secs();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(metrics_interval));
        loop {
            interval.tick().await;
            metrics.report().log();
        }
    });

    // Handle shutdown on Ctrl+C
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("shutdown_signal_received");
        let _ = shutdown_tx.send(true);
    });

    // Run the API server in the foreground until shutdown
    coleta_poc::io::server::start_api_server(
        config.bind_address(),
        config.port(),
        state,
        shutdown_rx,
    )
    .await?;

    info!("coleta-poc shutdown complete");
    Ok(())
}
