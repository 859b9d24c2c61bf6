//! API gateway.
//!
//! A reverse proxy that picks an upstream service by longest path prefix.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────┐
//!                          │                  GATEWAY                      │
//!                          │                                               │
//!     Client Request       │  ┌─────────┐    ┌──────────┐    ┌─────────┐  │
//!     ─────────────────────┼─▶│  http   │───▶│ dispatch │───▶│ routing │  │
//!                          │  │ server  │    │          │◀───│  table  │  │
//!                          │  └─────────┘    └────┬─────┘    └─────────┘  │
//!                          │                      │ rewrite + headers      │
//!                          │                      ▼                        │
//!     Client Response      │  ┌─────────┐    ┌──────────┐                 │
//!     ◀────────────────────┼──│ 404/502 │    │ forward  │◀────────────────┼──── Upstream
//!                          │  │  or     │◀───│ (hyper)  │─────────────────┼───▶ Service
//!                          │  │upstream │    └──────────┘                 │
//!                          │  └─────────┘                                 │
//!                          │                                               │
//!                          │  config (YAML) · lifecycle · logging          │
//!                          └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use api_gateway::config::load_config;
use api_gateway::lifecycle::startup;
use api_gateway::observability::init_logging;
use api_gateway::RouteTable;

#[derive(Parser)]
#[command(name = "api-gateway")]
#[command(about = "Path-prefix routing reverse proxy", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override the configured listen port.
    #[arg(short, long)]
    port: Option<u16>,

    /// Load the configuration, print the route table and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            tracing::error!(path = %cli.config.display(), error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    if let Some(port) = cli.port.filter(|p| *p != 0) {
        config.port = port;
    }

    init_logging(&config.log_level);

    tracing::info!(
        config = %cli.config.display(),
        listen = %config.listen_address(),
        services = config.services.len(),
        matching = ?config.route_matching,
        "api-gateway v0.1.0 starting"
    );

    if cli.check {
        let table = RouteTable::from_config(&config);
        for route in table.iter() {
            println!(
                "{:<24} {:<32} strip_path={:<5} {}",
                route.prefix(),
                route.origin(),
                route.strip_path(),
                route.name()
            );
        }
        println!("{} of {} services routable", table.len(), config.services.len());
        return Ok(());
    }

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
