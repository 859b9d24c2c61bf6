//! Disposable upstream for trying the gateway by hand.
//!
//! Answers every request with the port it listens on, the path it received
//! and the request headers, one per line.

use std::net::SocketAddr;

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    Router,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "echo-server")]
#[command(about = "Echo test upstream for the API gateway", long_about = None)]
struct Cli {
    /// Port to listen on.
    port: u16,
}

async fn echo(State(port): State<u16>, method: Method, uri: Uri, headers: HeaderMap) -> String {
    tracing::info!(method = %method, path = %uri.path(), "Echo request");

    let mut body = format!("echo server on port {port}, path: {}\n\nheaders:\n", uri.path());
    for (name, value) in &headers {
        body.push_str(&format!("{}: {}\n", name, value.to_str().unwrap_or("<binary>")));
    }
    body
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "echo_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let app = Router::new().fallback(echo).with_state(cli.port);

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Echo server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
