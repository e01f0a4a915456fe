//! DevOps Calculator API library.
//!
//! Exposes the router so the service can be embedded or driven in tests
//! without binding a socket.

pub mod calculator;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::{build_router, AppState, HttpServer};
pub use lifecycle::Shutdown;
