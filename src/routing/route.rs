//! A single compiled route.
//!
//! # Responsibilities
//! - Parse a service's target into an upstream origin
//! - Snapshot the service's static headers as typed header values
//! - Expose everything the rewrite step needs, read-only
//!
//! # Design Decisions
//! - Routes are plain immutable values owned by the route table
//! - Only scheme + authority of the target are kept; its path is ignored
//! - `http` and `https` origins are accepted, any other scheme is rejected

use axum::http::uri::{Authority, Scheme};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::config::{MatchMode, ServiceConfig};
use crate::routing::matcher::PathPrefix;

/// Reasons a service cannot be turned into a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid target URL `{target}`: {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("unsupported scheme `{scheme}` in target `{target}`")]
    UnsupportedScheme { target: String, scheme: String },

    #[error("target `{0}` has no host")]
    MissingHost(String),

    #[error("invalid static header `{0}`")]
    InvalidHeader(String),
}

/// Scheme and authority of an upstream service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: Scheme,
    authority: Authority,
}

impl Origin {
    /// Parse an absolute URL, keeping only its scheme, host and port.
    pub fn parse(target: &str) -> Result<Self, RouteError> {
        let url = Url::parse(target).map_err(|e| RouteError::InvalidTarget {
            target: target.to_string(),
            reason: e.to_string(),
        })?;

        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => {
                return Err(RouteError::UnsupportedScheme {
                    target: target.to_string(),
                    scheme: other.to_string(),
                })
            }
        };

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| RouteError::MissingHost(target.to_string()))?;

        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let authority = authority
            .parse::<Authority>()
            .map_err(|e| RouteError::InvalidTarget {
                target: target.to_string(),
                reason: e.to_string(),
            })?;

        if url.path() != "/" {
            tracing::debug!(target = %target, "Ignoring path component of target");
        }

        Ok(Self { scheme, authority })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}

/// A compiled route: prefix, upstream origin and rewrite rule.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    prefix: PathPrefix,
    origin: Origin,
    strip_path: bool,
    headers: HeaderMap,
}

impl Route {
    /// Compile a service descriptor into a route.
    pub fn from_service(service: &ServiceConfig, mode: MatchMode) -> Result<Self, RouteError> {
        let origin = Origin::parse(&service.target)?;

        let mut headers = HeaderMap::with_capacity(service.headers.len());
        for (name, value) in &service.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| RouteError::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| RouteError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            name: service.name.clone(),
            prefix: PathPrefix::new(service.path.clone(), mode),
            origin,
            strip_path: service.strip_path,
            headers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &PathPrefix {
        &self.prefix
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn strip_path(&self) -> bool {
        self.strip_path
    }

    /// Static headers set on every forwarded request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}
