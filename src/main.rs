//! DevOps Calculator API
//!
//! Arithmetic over HTTP with structured request logging and in-memory
//! Prometheus metrics, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ listener ──▶ request lifecycle ──▶ router ──▶ handler
//!                          (trace id, timer,        │          │
//!                           incoming log)           │          ▼
//!                                                   │      calculator
//!   Client ◀── response ◀── request lifecycle ◀─────┘
//!                          (metrics record,
//!                           completion log)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use calculator_api::config::load_config;
use calculator_api::lifecycle::{shutdown_signal, Shutdown};
use calculator_api::observability::logging::init_logging;
use calculator_api::HttpServer;

#[derive(Parser)]
#[command(name = "calculator-api")]
#[command(about = "Arithmetic HTTP service with request logging and metrics", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen port; overrides the config file and PORT
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    init_logging(&config.logging)?;

    tracing::debug!(
        host = %config.listener.host,
        port = config.listener.port,
        format = ?config.logging.format,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Calculator API running on port {}", local_addr.port());

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_shutdown.trigger();
    });

    let server = HttpServer::new();
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
