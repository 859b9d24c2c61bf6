//! Route table construction and lookup.
//!
//! # Responsibilities
//! - Compile service descriptors into routes (builder phase)
//! - Freeze the routes into an immutable, shareable table
//! - Look up the longest matching prefix for a request path
//!
//! # Design Decisions
//! - Two types for two phases: `RouteTableBuilder` is mutable and owned by
//!   startup code, `RouteTable` has no mutating methods and is shared via
//!   `Arc` (thread-safe without locks)
//! - Same prefix registered twice: the later service replaces the earlier
//! - Services with an unusable target are skipped with a warning
//! - Frozen routes are sorted by descending prefix length, then by prefix
//!   bytes, so the first match in a linear scan is the longest one and the
//!   order never depends on hashing
//! - O(n) path prefix scan (acceptable for typical route counts)

use std::collections::HashMap;

use crate::config::{GatewayConfig, MatchMode, ServiceConfig};
use crate::routing::route::{Route, RouteError};

/// Mutable startup-time collection of routes keyed by prefix.
#[derive(Debug)]
pub struct RouteTableBuilder {
    mode: MatchMode,
    routes: HashMap<String, Route>,
}

impl RouteTableBuilder {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            routes: HashMap::new(),
        }
    }

    /// Compile and register a service.
    ///
    /// On error nothing is registered and the table is left unchanged.
    pub fn add_service(&mut self, service: &ServiceConfig) -> Result<(), RouteError> {
        let route = Route::from_service(service, self.mode)?;

        if let Some(previous) = self.insert(route) {
            tracing::warn!(
                service = %service.name,
                replaced = %previous.name(),
                prefix = %previous.prefix(),
                "Duplicate route prefix, later service wins"
            );
        }
        Ok(())
    }

    /// Register a compiled route, returning the route it replaced, if any.
    pub fn insert(&mut self, route: Route) -> Option<Route> {
        self.routes.insert(route.prefix().as_str().to_string(), route)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Freeze into a read-only table, logging each surviving route.
    pub fn build(self) -> RouteTable {
        let mut routes: Vec<Route> = self.routes.into_values().collect();
        routes.sort_by(|a, b| {
            let (a, b) = (a.prefix().as_str(), b.prefix().as_str());
            b.len().cmp(&a.len()).then_with(|| a.cmp(b))
        });

        for route in &routes {
            tracing::info!(
                service = %route.name(),
                prefix = %route.prefix(),
                upstream = %route.origin(),
                strip_path = route.strip_path(),
                "Registered service"
            );
        }

        RouteTable {
            mode: self.mode,
            routes,
        }
    }
}

/// Frozen route table. Built once, then only read.
#[derive(Debug)]
pub struct RouteTable {
    mode: MatchMode,
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build the table from configuration, skipping unusable services.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut builder = RouteTableBuilder::new(config.route_matching);

        for service in &config.services {
            if let Err(e) = builder.add_service(service) {
                tracing::warn!(
                    service = %service.name,
                    prefix = %service.path,
                    error = %e,
                    "Skipping service"
                );
            }
        }

        let table = builder.build();
        tracing::info!(
            routes = table.len(),
            configured = config.services.len(),
            matching = ?table.mode(),
            "Route table built"
        );
        table
    }

    /// Find the route with the longest prefix covering `path`.
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.prefix().matches(path))
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in lookup order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn service(name: &str, path: &str, target: &str) -> ServiceConfig {
        ServiceConfig {
            name: name.into(),
            path: path.into(),
            target: target.into(),
            strip_path: false,
            headers: Default::default(),
        }
    }

    fn table(services: Vec<ServiceConfig>, mode: MatchMode) -> RouteTable {
        let config = GatewayConfig {
            services,
            route_matching: mode,
            ..Default::default()
        };
        RouteTable::from_config(&config)
    }

    #[test]
    fn longest_prefix_wins() {
        let table = table(
            vec![
                service("root", "/", "http://127.0.0.1:1"),
                service("api", "/api", "http://127.0.0.1:2"),
                service("users", "/api/users", "http://127.0.0.1:3"),
            ],
            MatchMode::Bytes,
        );

        assert_eq!(table.lookup("/api/users/7").unwrap().name(), "users");
        assert_eq!(table.lookup("/api/orders").unwrap().name(), "api");
        assert_eq!(table.lookup("/index.html").unwrap().name(), "root");
    }

    #[test]
    fn registration_order_does_not_matter() {
        let table = table(
            vec![
                service("users", "/api/users", "http://127.0.0.1:3"),
                service("api", "/api", "http://127.0.0.1:2"),
            ],
            MatchMode::Bytes,
        );

        assert_eq!(table.lookup("/api/users").unwrap().name(), "users");
    }

    #[test]
    fn no_match_returns_none() {
        let table = table(
            vec![service("api", "/api", "http://127.0.0.1:2")],
            MatchMode::Bytes,
        );
        assert!(table.lookup("/other").is_none());

        let empty = RouteTableBuilder::new(MatchMode::Bytes).build();
        assert!(empty.is_empty());
        assert!(empty.lookup("/").is_none());
    }

    #[test]
    fn bytes_mode_matches_inside_segment() {
        let bytes = table(
            vec![service("api", "/api", "http://127.0.0.1:2")],
            MatchMode::Bytes,
        );
        assert_eq!(bytes.lookup("/apikey").unwrap().name(), "api");

        let segments = table(
            vec![service("api", "/api", "http://127.0.0.1:2")],
            MatchMode::Segments,
        );
        assert!(segments.lookup("/apikey").is_none());
        assert_eq!(segments.lookup("/api/key").unwrap().name(), "api");
    }

    #[test]
    fn segments_mode_falls_back_to_shorter_prefix() {
        let table = table(
            vec![
                service("api", "/api", "http://127.0.0.1:2"),
                service("apikeys", "/apikeys", "http://127.0.0.1:3"),
            ],
            MatchMode::Segments,
        );

        assert_eq!(table.lookup("/apikeys/1").unwrap().name(), "apikeys");
        assert!(table.lookup("/apikeysx").is_none());
        assert_eq!(table.lookup("/api/1").unwrap().name(), "api");
    }

    #[test]
    fn invalid_target_is_skipped_others_remain() {
        let table = table(
            vec![
                service("broken", "/broken", "::not a url::"),
                service("ftp", "/ftp", "ftp://example.com"),
                service("ok", "/ok", "http://127.0.0.1:2"),
            ],
            MatchMode::Bytes,
        );

        assert_eq!(table.len(), 1);
        assert!(table.lookup("/broken/x").is_none());
        assert!(table.lookup("/ftp").is_none());
        assert_eq!(table.lookup("/ok").unwrap().name(), "ok");
    }

    #[test]
    fn https_target_is_routable() {
        let table = table(
            vec![service("secure", "/secure", "https://example.com")],
            MatchMode::Bytes,
        );

        assert_eq!(table.len(), 1);
        let route = table.lookup("/secure/x").unwrap();
        assert_eq!(route.name(), "secure");
        assert_eq!(route.origin().to_string(), "https://example.com");
    }

    #[test]
    fn duplicate_prefix_last_write_wins() {
        let table = table(
            vec![
                service("first", "/dup", "http://127.0.0.1:1"),
                service("second", "/dup", "http://127.0.0.1:2"),
            ],
            MatchMode::Bytes,
        );

        assert_eq!(table.len(), 1);
        let route = table.lookup("/dup").unwrap();
        assert_eq!(route.name(), "second");
        assert_eq!(route.origin().authority().as_str(), "127.0.0.1:2");
    }

    #[test]
    fn failed_add_leaves_builder_unchanged() {
        let mut builder = RouteTableBuilder::new(MatchMode::Bytes);
        builder
            .add_service(&service("ok", "/x", "http://127.0.0.1:1"))
            .unwrap();
        assert!(builder
            .add_service(&service("bad", "/x", "nope"))
            .is_err());
        assert_eq!(builder.len(), 1);
        assert!(!builder.is_empty());

        let table = builder.build();
        assert_eq!(table.lookup("/x").unwrap().name(), "ok");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn replaced_service_is_not_logged_as_registered() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            table(
                vec![
                    service("first", "/dup", "http://127.0.0.1:1"),
                    service("second", "/dup", "http://127.0.0.1:2"),
                ],
                MatchMode::Bytes,
            )
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        let registered: Vec<&str> = output
            .lines()
            .filter(|line| line.contains("Registered service"))
            .collect();
        assert_eq!(registered.len(), 1);
        assert!(registered[0].contains("service=second"));
        assert!(output.contains("Duplicate route prefix"));
    }

    #[test]
    fn iteration_order_is_deterministic() {
        let table = table(
            vec![
                service("b", "/bb", "http://127.0.0.1:1"),
                service("a", "/aa", "http://127.0.0.1:1"),
                service("long", "/aaaa", "http://127.0.0.1:1"),
                service("root", "/", "http://127.0.0.1:1"),
            ],
            MatchMode::Bytes,
        );

        let prefixes: Vec<_> = table.iter().map(|r| r.prefix().as_str()).collect();
        assert_eq!(prefixes, vec!["/aaaa", "/aa", "/bb", "/"]);
    }
}
