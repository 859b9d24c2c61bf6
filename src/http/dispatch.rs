//! Request dispatch.
//!
//! Every request ends in exactly one of three outcomes:
//!
//! ```text
//! received → matched → forwarded → upstream response
//! received → unmatched → 404
//! received → matched → forward failed → 502
//! ```
//!
//! Nothing is retried and no failure escapes as an error: the caller always
//! gets a response.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};

use crate::http::forward::Forward;
use crate::http::proxy_headers::prepare_request_headers;
use crate::http::request::request_id;
use crate::http::response;
use crate::routing::rewrite::{apply_static_headers, rewrite_uri};
use crate::routing::RouteTable;

/// Matches requests against the route table and forwards them.
pub struct Dispatcher<F> {
    table: Arc<RouteTable>,
    forwarder: F,
}

impl<F: Forward> Dispatcher<F> {
    pub fn new(table: Arc<RouteTable>, forwarder: F) -> Self {
        Self { table, forwarder }
    }

    /// Handle one inbound request.
    pub async fn dispatch(
        &self,
        request: Request<Body>,
        client_addr: Option<SocketAddr>,
    ) -> Response<Body> {
        let request_id = request_id(&request).to_string();
        let method = request.method().clone();
        let original_path = request.uri().path().to_string();

        let Some(route) = self.table.lookup(&original_path) else {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %original_path,
                "No route matched"
            );
            return response::not_found();
        };

        let (mut parts, body) = request.into_parts();
        parts.uri = rewrite_uri(route, &parts.uri);
        prepare_request_headers(&mut parts.headers, client_addr);
        apply_static_headers(route, &mut parts.headers);

        tracing::debug!(
            request_id = %request_id,
            method = %method,
            path = %original_path,
            prefix = %route.prefix(),
            service = %route.name(),
            upstream = %route.origin(),
            forwarded_path = %parts.uri.path(),
            "Forwarding request"
        );

        match self
            .forwarder
            .forward(Request::from_parts(parts, body), route.origin())
            .await
        {
            Ok(response) => {
                tracing::info!(
                    request_id = %request_id,
                    method = %method,
                    path = %original_path,
                    service = %route.name(),
                    status = %response.status(),
                    "Upstream responded"
                );
                response
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    method = %method,
                    path = %original_path,
                    service = %route.name(),
                    upstream = %route.origin(),
                    error = %e,
                    "Upstream error"
                );
                response::bad_gateway()
            }
        }
    }
}
