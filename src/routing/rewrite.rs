//! Per-route request rewriting.
//!
//! Applied by the dispatcher after a route is chosen:
//! 1. `rewrite_uri` strips the route prefix when `strip_path` is set
//! 2. proxy headers are added by the http layer
//! 3. `apply_static_headers` sets the route's headers last, overwriting

use std::borrow::Cow;

use axum::http::uri::PathAndQuery;
use axum::http::{HeaderMap, Uri};

use crate::routing::route::Route;

/// Path to forward for `path` under `route`.
///
/// With `strip_path` the prefix is removed and the result always starts with
/// `/`. Without it, or if the prefix does not cover `path`, the path is
/// returned unchanged.
pub fn rewrite_path<'a>(route: &Route, path: &'a str) -> Cow<'a, str> {
    if !route.strip_path() {
        return Cow::Borrowed(path);
    }

    match route.prefix().remainder(path) {
        Some(rest) if rest.starts_with('/') => Cow::Borrowed(rest),
        Some(rest) => Cow::Owned(format!("/{rest}")),
        None => {
            tracing::warn!(
                path = %path,
                prefix = %route.prefix(),
                service = %route.name(),
                "Request path does not start with route prefix, not stripping"
            );
            Cow::Borrowed(path)
        }
    }
}

/// Rewrite the path of `uri` for `route`, keeping the query string.
pub fn rewrite_uri(route: &Route, uri: &Uri) -> Uri {
    let path = rewrite_path(route, uri.path());
    if path == uri.path() {
        return uri.clone();
    }

    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.into_owned(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = match path_and_query.parse::<PathAndQuery>() {
        Ok(pq) => Some(pq),
        Err(e) => {
            tracing::warn!(error = %e, uri = %uri, "Rewritten path is not a valid URI, keeping original");
            return uri.clone();
        }
    };

    Uri::from_parts(parts).unwrap_or_else(|_| uri.clone())
}

/// Set every static header of `route`, replacing existing values.
pub fn apply_static_headers(route: &Route, headers: &mut HeaderMap) {
    for (name, value) in route.headers() {
        headers.insert(name.clone(), value.clone());
    }
}
