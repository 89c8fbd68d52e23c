//! Solver Gateway
//!
//! Receives sudoku solve requests and forwards each one to the solver
//! backend registered for its route.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌──────────┐   ┌────────────┐   ┌──────────┐   ┌──────────┐
//!     ──────────────────▶│  server  │──▶│ validation │──▶│  health  │──▶│ upstream │──▶ Solver
//!                        │ (accept) │   │ header/body│   │  probe   │   │ forwarder│
//!     Client Response    └──────────┘   └────────────┘   └──────────┘   └──────────┘
//!     ◀─────────────────────────── status + status text (+ solver body) ◀────────────
//!
//!     SIGINT / SIGTERM ──▶ lifecycle::shutdown ──▶ net::connection registry
//!                          close all → destroy at 1s → exit 0 / exit 1 at 5s
//! ```

use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::net::TcpListener;

use solver_gateway::config::{load_config, GatewayConfig, SolverRoute};
use solver_gateway::lifecycle::termination_signal;
use solver_gateway::observability::init_logging;
use solver_gateway::GatewayServer;

#[derive(Parser, Debug)]
#[command(name = "solver-gateway", version, about = "Health-gated gateway for sudoku solver backends")]
struct Cli {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listening port. Overrides ACCESS_PORT and the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.port)?;
    init_logging(&config.observability);

    tracing::info!("solver-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    report_routes(&config);

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let outcome = GatewayServer::new(config)
        .run(listener, termination_signal())
        .await?;

    tracing::info!(exit_code = outcome.exit_code(), "Shutdown complete");
    std::process::exit(outcome.exit_code());
}

/// Log the mounted routes and warn about likely misconfiguration.
fn report_routes(config: &GatewayConfig) {
    for route in SolverRoute::ALL {
        match config.descriptor(route) {
            Some(descriptor) => tracing::info!(
                route = %route,
                path = route.path(),
                forward_url = %descriptor.forward_url,
                health_url = %descriptor.health_url,
                "Solver route configured"
            ),
            None => tracing::warn!(
                route = %route,
                path = route.path(),
                "Solver route not configured, requests to it will get 404"
            ),
        }
    }

    let mut by_url: HashMap<&str, Vec<SolverRoute>> = HashMap::new();
    for descriptor in &config.routes {
        by_url
            .entry(descriptor.forward_url.as_str())
            .or_default()
            .push(descriptor.route);
    }
    for (forward_url, routes) in by_url.into_iter().filter(|(_, routes)| routes.len() > 1) {
        tracing::warn!(
            forward_url = %forward_url,
            routes = ?routes,
            "Several routes forward to the same solver"
        );
    }
}
