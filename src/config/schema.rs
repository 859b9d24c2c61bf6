//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from the YAML file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Port used when the file omits `port` or sets it to zero.
pub const DEFAULT_PORT: u16 = 8080;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listen port. Zero means "use the default".
    pub port: u16,

    /// Listen address, without the port.
    pub bind_address: String,

    /// Upstream services, in file order.
    pub services: Vec<ServiceConfig>,

    /// How a route prefix is compared against a request path.
    pub route_matching: MatchMode,

    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,

    /// Bound on the connection drain after a shutdown signal.
    pub shutdown_grace_secs: u64,

    /// Settings for the upstream HTTP client.
    pub upstream: UpstreamConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_address: "0.0.0.0".to_string(),
            services: Vec::new(),
            route_matching: MatchMode::default(),
            log_level: "info".to_string(),
            shutdown_grace_secs: 5,
            upstream: UpstreamConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Full `host:port` listen address.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// A single upstream service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServiceConfig {
    /// Service name, only used in logs.
    #[serde(default)]
    pub name: String,

    /// Route prefix, e.g. `/api`.
    pub path: String,

    /// Upstream origin, e.g. `http://127.0.0.1:3000`.
    pub target: String,

    /// Remove `path` from the request path before forwarding.
    #[serde(default)]
    pub strip_path: bool,

    /// Headers set on every forwarded request.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Prefix comparison mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Plain byte prefix: `/api` matches `/apikey`.
    #[default]
    Bytes,
    /// Prefix must end on a path segment boundary: `/api` matches `/api`
    /// and `/api/x` but not `/apikey`.
    Segments,
}

/// Upstream client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// How long an idle pooled connection is kept, in seconds.
    pub pool_idle_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            pool_idle_timeout_secs: 90,
        }
    }
}
