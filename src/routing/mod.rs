//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     ServiceConfig[]
//!     → route.rs (parse target origin, snapshot headers)
//!     → table.rs RouteTableBuilder (prefix → Route, last write wins)
//!     → freeze as immutable RouteTable, sorted longest prefix first
//!
//! Incoming Request (path):
//!     → table.rs (route lookup)
//!     → matcher.rs (evaluate prefix)
//!     → rewrite.rs (strip path, static headers)
//!     → Return: rewritten request for the forwarder, or NoMatch
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - Longest prefix wins

pub mod matcher;
pub mod rewrite;
pub mod route;
pub mod table;

pub use matcher::PathPrefix;
pub use route::{Origin, Route, RouteError};
pub use table::{RouteTable, RouteTableBuilder};
