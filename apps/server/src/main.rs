//! Conan Server - standalone now-playing page for foobar2000.
//!
//! This binary polls a foobar2000 instance through Beefweb and serves a
//! single-client player page that receives live HTML fragment updates over
//! a WebSocket.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use conan_core::{bootstrap_services, start_server, AppState};
use tokio::signal;

use crate::config::ServerConfig;

/// Conan Server - live now-playing page for foobar2000.
#[derive(Parser, Debug)]
#[command(name = "conan-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "info", env = "CONAN_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Bind port (overrides config file).
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Beefweb API base URL (overrides config file).
    #[arg(short = 'u', long, value_name = "URL")]
    api_url: Option<String>,

    /// Poll interval in milliseconds (overrides config file).
    #[arg(long, value_name = "MS")]
    poll_interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Conan Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config =
        ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.bind_port = port;
    }
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(ms) = args.poll_interval_ms {
        config.poll_interval_ms = ms;
    }

    log::info!(
        "Configuration: bind_port={}, api_url={}, poll_interval_ms={}, request_timeout_ms={}",
        config.bind_port,
        config.api_url,
        config.poll_interval_ms,
        config.request_timeout_ms
    );

    let core_config = config.to_core_config();
    let handle = tokio::runtime::Handle::current();
    let services =
        bootstrap_services(&core_config, handle).context("Failed to bootstrap services")?;

    log::info!("Services bootstrapped successfully");

    services.start_background_tasks();

    log::info!("Background tasks started");

    let app_state = AppState::new(&services);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(app_state).await {
            log::error!("Server error: {}", e);
        }
    });

    log::info!("HTTP server started on port {}", config.bind_port);

    // Wait for shutdown signal
    shutdown_signal().await;

    log::info!("Shutdown signal received, cleaning up...");

    // Graceful shutdown
    services.shutdown().await;

    // Abort the server task; the engine and client are already gone
    server_handle.abort();

    log::info!("Shutdown complete");
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
