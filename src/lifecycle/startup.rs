//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listener from validated configuration
//! - Build the route table and HTTP server
//! - Run until a termination signal, then drain and return
//!
//! # Design Decisions
//! - Fail fast: bind errors are fatal
//! - Routes are built before the listener starts serving
//! - Unusable services are not startup errors (see routing::table)

use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::HttpServer;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;

/// Error type for startup and serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Bind the configured listen address.
pub async fn bind(config: &GatewayConfig) -> Result<TcpListener, StartupError> {
    let address = config.listen_address();
    TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}

/// Serve `config` until SIGINT/SIGTERM, then shut down gracefully.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    let listener = bind(&config).await?;
    let server = HttpServer::new(config);

    let shutdown = Shutdown::new();
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            // The server stopped on its own, which only happens on error.
            result??;
            return Ok(());
        }
        _ = signals::wait_for_signal() => shutdown.trigger(),
    }

    server_task.await??;
    Ok(())
}
