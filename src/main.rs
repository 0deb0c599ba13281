//! Authentication Relay (v1)
//!
//! A thin authentication relay built with Tokio and Axum. Requests whose path
//! begins with the configured auth prefix are normalized into a
//! framework-independent form, handed to the identity provider, and its
//! response is translated back onto the wire.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │               AUTH RELAY                      │
//!                    │                                               │
//!   Client Request   │  ┌─────────┐   ┌────────────┐   ┌─────────┐  │
//!   ─────────────────┼─▶│  http   │──▶│ normalizer │──▶│ identity│──┼──▶ Identity
//!                    │  │ server  │   │            │   │  relay  │  │    Provider
//!                    │  └─────────┘   └────────────┘   └────┬────┘  │
//!                    │                                      │       │
//!   Client Response  │  ┌────────────┐                      │       │
//!   ◀────────────────┼──│ translate  │◀─────────────────────┘       │
//!                    │  └────────────┘                              │
//!                    │                                               │
//!                    │  ┌─────────────────────────────────────────┐ │
//!                    │  │          Cross-Cutting Concerns          │ │
//!                    │  │  config · observability · lifecycle      │ │
//!                    │  └─────────────────────────────────────────┘ │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use auth_relay::config::loader::load_config;
use auth_relay::http::HttpServer;
use auth_relay::lifecycle::Shutdown;
use auth_relay::observability;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "auth-relay", about = "Authentication relay for the habit tracker backend")]
struct Args {
    /// Path to a TOML configuration file. Required secrets may also be
    /// supplied through the environment.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::logging::init();

    tracing::info!("auth-relay v0.1.0 starting");

    let args = Args::parse();

    // Fail fast: missing required configuration exits non-zero before any
    // socket is bound.
    let config = load_config(args.config.as_deref())?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        auth_prefix = %config.auth.path_prefix,
        base_origin = %config.auth.base_origin,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Initialize metrics exporter
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Create and run HTTP server
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
