//! Request lifecycle middleware.
//!
//! # Responsibilities
//! - Generate a unique trace ID (UUID v4) per request
//! - Log the incoming request and its completion
//! - Record per-path timings into the metrics aggregator
//! - Turn panics escaping a handler into a 500 response
//!
//! # Design Decisions
//! - Trace ID is inserted into request extensions; handlers take it as an
//!   explicit `Extension<TraceId>` argument
//! - Metrics are recorded synchronously once the handler has produced its
//!   response, exactly once per request whatever the status
//! - The path is recorded before any validation, so unknown operations get
//!   their own series

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::http::error::ApiError;
use crate::observability::MetricsAggregator;

/// Response header echoing the request's trace ID.
pub const X_TRACE_ID: &str = "x-trace-id";

/// Per-request correlation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct TraceId(Uuid);

impl TraceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Middleware wrapping every request: trace ID, logging, timing, metrics.
pub async fn request_lifecycle(
    State(metrics): State<Arc<MetricsAggregator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let trace_id = TraceId::new();
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    request.extensions_mut().insert(trace_id);

    tracing::info!(
        method = %method,
        path = %path,
        trace_id = %trace_id,
        "Incoming request"
    );

    let mut response = match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => ApiError::Internal {
            detail: panic_message(panic.as_ref()),
            trace_id,
        }
        .into_response(),
    };

    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    metrics.record(&path, elapsed_ms);

    tracing::info!(
        path = %path,
        status_code = response.status().as_u16(),
        trace_id = %trace_id,
        response_time_ms = elapsed_ms,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
        response.headers_mut().insert(X_TRACE_ID, value);
    }

    response
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
