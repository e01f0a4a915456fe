//! Error responses.
//!
//! Every error body carries the request's trace ID:
//! `{"error": "<message>", "traceId": "<uuid>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::calculator::CalcError;
use crate::http::request::TraceId;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The calculation was rejected; a client error.
    #[error("{source}")]
    Calculation { source: CalcError, trace_id: TraceId },

    #[error("Not found")]
    NotFound { trace_id: TraceId },

    /// A defect in handler logic. `detail` is logged, never sent.
    #[error("Internal server error")]
    Internal { detail: String, trace_id: TraceId },
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(rename = "traceId")]
    pub trace_id: TraceId,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Calculation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn trace_id(&self) -> TraceId {
        match self {
            ApiError::Calculation { trace_id, .. }
            | ApiError::NotFound { trace_id }
            | ApiError::Internal { trace_id, .. } => *trace_id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { detail, trace_id } = &self {
            tracing::error!(error = %detail, trace_id = %trace_id, "Unhandled error");
        }

        let body = ErrorBody {
            error: self.to_string(),
            trace_id: self.trace_id(),
        };
        (self.status(), Json(body)).into_response()
    }
}
