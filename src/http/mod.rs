//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → dispatch.rs (route lookup, rewrite)
//!     → proxy_headers.rs (hop-by-hop, X-Forwarded-For)
//!     → forward.rs (send to upstream origin, stream response)
//!     → response.rs (404 / 502 when there is no upstream response)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod forward;
pub mod proxy_headers;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::Dispatcher;
pub use forward::{Forward, ForwardError, HttpForwarder};
pub use request::X_REQUEST_ID;
pub use server::HttpServer;
