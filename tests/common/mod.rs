//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use api_gateway::config::{parse_config, GatewayConfig};
use api_gateway::{HttpServer, Shutdown};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::IntoResponse,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Start an upstream that answers every request with a JSON description of
/// what it received, tagged with `name`.
pub async fn start_echo_backend(name: &'static str) -> SocketAddr {
    async fn echo(
        State(name): State<&'static str>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
    ) -> impl IntoResponse {
        let headers: serde_json::Map<String, Value> = headers
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v.to_str().unwrap_or_default())))
            .collect();

        (
            [("x-echo", name)],
            Json(json!({
                "backend": name,
                "method": method.as_str(),
                "path": uri.path(),
                "query": uri.query(),
                "headers": headers,
                "body": String::from_utf8_lossy(&body),
            })),
        )
    }

    let app = Router::new().fallback(echo).with_state(name);
    serve(app).await
}

/// Start an upstream whose responses carry hop-by-hop headers, including
/// one only marked hop-by-hop by its `Connection` header.
#[allow(dead_code)]
pub async fn start_hop_header_backend() -> SocketAddr {
    let app = Router::new().fallback(|| async {
        (
            [
                ("connection", "x-upstream-secret"),
                ("x-upstream-secret", "1"),
                ("keep-alive", "timeout=5"),
                ("x-kept", "1"),
            ],
            "ok",
        )
    });
    serve(app).await
}

/// Start an upstream that waits `delay` before answering "slow".
#[allow(dead_code)]
pub async fn start_slow_backend(delay: Duration) -> SocketAddr {
    let app = Router::new()
        .fallback(|State(delay): State<Duration>| async move {
            tokio::time::sleep(delay).await;
            "slow"
        })
        .with_state(delay);
    serve(app).await
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A running gateway.
pub struct Gateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub task: JoinHandle<Result<(), std::io::Error>>,
}

impl Gateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a gateway from YAML text on an ephemeral port.
#[allow(dead_code)]
pub async fn start_gateway_yaml(yaml: &str) -> Gateway {
    start_gateway(parse_config(yaml).expect("valid test config")).await
}

/// Start a gateway from a config on an ephemeral port.
pub async fn start_gateway(config: GatewayConfig) -> Gateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Gateway {
        addr,
        shutdown,
        task,
    }
}

/// HTTP client that talks to the gateway directly.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
