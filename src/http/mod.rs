//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routing table)
//!     → request.rs (trace ID, incoming log, timer)
//!     → handlers.rs (welcome, health, metrics, calculation)
//!     → error.rs (failures mapped to JSON bodies)
//!     → request.rs (metrics record, completion log)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::{TraceId, X_TRACE_ID};
pub use server::{build_router, AppState, HttpServer};
