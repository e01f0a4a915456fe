//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request middleware produces:
//!     → logging.rs (structured JSON log events, one per line)
//!     → metrics.rs (per-path counters and timings)
//!
//! Consumers:
//!     → stdout log collection
//!     → GET /metrics (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Trace ID attached to every request log line
//! - Metrics live in memory only and reset on restart

pub mod logging;
pub mod metrics;

pub use metrics::MetricsAggregator;
