//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all dispatch handler
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener
//! - Drain in-flight requests on shutdown, bounded by the grace period

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Notify};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::dispatch::Dispatcher;
use crate::http::forward::{Forward, HttpForwarder};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::routing::RouteTable;

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    table: Arc<RouteTable>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Self {
        let table = Arc::new(RouteTable::from_config(&config));
        let forwarder = HttpForwarder::new(&config.upstream);
        Self::with_forwarder(config, table, forwarder)
    }

    /// Create a server around an already built table and forwarder.
    pub fn with_forwarder<F: Forward>(
        config: GatewayConfig,
        table: Arc<RouteTable>,
        forwarder: F,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(table.clone(), forwarder));
        let router = Self::build_router(dispatcher);
        Self {
            router,
            config,
            table,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router<F: Forward>(dispatcher: Arc<Dispatcher<F>>) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler::<F>))
            .route("/", any(proxy_handler::<F>))
            .with_state(dispatcher)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer()),
            )
    }

    /// Run the server until `shutdown` fires, then drain.
    ///
    /// Once shutdown starts no new connections are accepted. In-flight
    /// requests get `shutdown_grace_secs` to finish; after that this returns
    /// without waiting for them, and they end with the runtime.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.table.len(),
            "HTTP server starting"
        );

        let grace = Duration::from_secs(self.config.shutdown_grace_secs);
        let draining = Arc::new(Notify::new());
        let drain_started = draining.clone();

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        let server = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                // A dropped coordinator also counts as a shutdown request.
                let _ = shutdown.recv().await;
                tracing::info!(grace_secs = grace.as_secs(), "Draining connections");
                drain_started.notify_one();
            })
            .into_future();

        tokio::select! {
            result = server => result?,
            _ = async {
                draining.notified().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(
                    grace_secs = grace.as_secs(),
                    "Grace period elapsed, dropping in-flight requests"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The Axum router, for serving without a listener (tests, embedding).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Catch-all handler: hands every request to the dispatcher.
async fn proxy_handler<F: Forward>(
    State(dispatcher): State<Arc<Dispatcher<F>>>,
    request: Request<Body>,
) -> Response<Body> {
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    dispatcher.dispatch(request, client_addr).await
}
