//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Routing, dispatch and lifecycle produce:
//!     → logging.rs (structured log events with request IDs)
//!
//! Consumers:
//!     → stdout, collected by whatever runs the process
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings
//! - Request ID flows through every dispatch log line

pub mod logging;

pub use logging::init_logging;
