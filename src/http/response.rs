//! Fixed responses produced by the gateway itself.
//!
//! Upstream responses are relayed untouched apart from hop-by-hop header
//! removal in the forwarder; only the two terminal failure outcomes of the
//! dispatcher are generated here, both as short plain-text bodies.

use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;

pub const NOT_FOUND_BODY: &str = "No matching service";
pub const BAD_GATEWAY_BODY: &str = "Upstream request failed";

/// No route matched the request path.
pub fn not_found() -> Response<Body> {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

/// The forwarder could not obtain a response from the upstream.
pub fn bad_gateway() -> Response<Body> {
    (StatusCode::BAD_GATEWAY, BAD_GATEWAY_BODY).into_response()
}
