//! Forwarding primitive.
//!
//! # Responsibilities
//! - Send an already rewritten request to an upstream origin
//! - Stream the upstream response back without buffering
//!
//! # Design Decisions
//! - `Forward` is the seam between the dispatcher and the network, so the
//!   dispatcher can be driven by an in-memory forwarder in tests
//! - Only scheme and authority of the request URI are replaced; path and
//!   query are sent as the dispatcher left them
//! - Pooled HTTP/1.1 client over plain TCP or rustls, no retries

use std::future::Future;
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{InvalidUriParts, PathAndQuery};
use axum::http::{Request, Response, Uri, Version};
use hyper::body::Incoming;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::{TokioExecutor, TokioTimer};

use crate::config::UpstreamConfig;
use crate::http::proxy_headers::strip_hop_by_hop;
use crate::routing::Origin;

/// Error type for forwarding.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    #[error("invalid upstream URI: {0}")]
    InvalidUri(#[from] InvalidUriParts),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

/// Sends a request to an upstream origin and returns its response.
pub trait Forward: Send + Sync + 'static {
    fn forward(
        &self,
        request: Request<Body>,
        origin: &Origin,
    ) -> impl Future<Output = Result<Response<Body>, ForwardError>> + Send;
}

type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Forwarder backed by a pooled hyper client.
#[derive(Clone)]
pub struct HttpForwarder {
    client: UpstreamClient,
}

impl HttpForwarder {
    pub fn new(config: &UpstreamConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));
        connector.set_nodelay(true);
        connector.enforce_http(false);

        let connector = HttpsConnectorBuilder::new()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(connector);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .pool_timer(TokioTimer::new())
            .build(connector);

        Self { client }
    }
}

impl Forward for HttpForwarder {
    async fn forward(
        &self,
        request: Request<Body>,
        origin: &Origin,
    ) -> Result<Response<Body>, ForwardError> {
        let (mut parts, body) = request.into_parts();

        parts.uri = upstream_uri(parts.uri, origin)?;
        // The client only speaks HTTP/1.1 to upstreams.
        parts.version = Version::HTTP_11;

        let response: Response<Incoming> =
            self.client.request(Request::from_parts(parts, body)).await?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Point `uri` at `origin`, keeping its path and query.
fn upstream_uri(uri: Uri, origin: &Origin) -> Result<Uri, ForwardError> {
    let mut parts = uri.into_parts();
    parts.scheme = Some(origin.scheme().clone());
    parts.authority = Some(origin.authority().clone());
    if parts.path_and_query.is_none() {
        parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    Ok(Uri::from_parts(parts)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_upstream_is_an_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let forwarder = HttpForwarder::new(&UpstreamConfig::default());
        let origin = Origin::parse(&format!("http://{addr}")).unwrap();
        let request = Request::builder().uri("/ping").body(Body::empty()).unwrap();

        let err = forwarder.forward(request, &origin).await.unwrap_err();
        assert!(matches!(err, ForwardError::Upstream(_)));
    }

    #[test]
    fn upstream_uri_uses_origin_scheme_and_authority() {
        let origin = Origin::parse("https://example.com:8443").unwrap();
        let uri = upstream_uri("/users/7?page=2".parse().unwrap(), &origin).unwrap();
        assert_eq!(uri.to_string(), "https://example.com:8443/users/7?page=2");

        let origin = Origin::parse("http://127.0.0.1:9001").unwrap();
        let uri = upstream_uri(Uri::from_static("/"), &origin).unwrap();
        assert_eq!(uri.to_string(), "http://127.0.0.1:9001/");
    }

    #[tokio::test]
    async fn unreachable_https_upstream_is_an_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let forwarder = HttpForwarder::new(&UpstreamConfig::default());
        let origin = Origin::parse(&format!("https://{addr}")).unwrap();
        let request = Request::builder().uri("/ping").body(Body::empty()).unwrap();

        let err = forwarder.forward(request, &origin).await.unwrap_err();
        assert!(matches!(err, ForwardError::Upstream(_)));
    }
}
