//! To-do API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client ──▶ gateway ──┬── /api/auth*  ──▶ auth service
//!                          ├── /api/tasks* ──▶ task service
//!                          └── /*          ──▶ frontend (BFF)
//!
//!     /api/health is answered by the gateway itself.
//! ```
//!
//! Startup order: configuration, logging, metrics, listener.

use std::path::PathBuf;

use clap::Parser;

use todo_gateway::config::load_config;
use todo_gateway::lifecycle::{shutdown_signal, Shutdown};
use todo_gateway::observability::{init_logging, init_metrics};
use todo_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "todo-gateway")]
#[command(about = "Reverse proxy in front of the to-do services", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        profile = config.profile.as_str(),
        "todo-gateway starting"
    );
    tracing::info!(
        bind_address = %config.listener.bind_address,
        auth_url = %config.upstreams.auth_url,
        task_url = %config.upstreams.task_url,
        frontend_url = %config.upstreams.frontend_url(),
        proxy_timeout_secs = config.timeouts.proxy_secs,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        let addr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    shutdown.trigger_on(shutdown_signal());

    let server = HttpServer::new(config)?;
    server.serve(&shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
