//! Endpoint handlers.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::calculator;
use crate::http::error::ApiError;
use crate::http::request::TraceId;
use crate::http::server::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to the DevOps Calculator API";

#[derive(Debug, Serialize)]
pub struct Welcome {
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    pub operation: &'static str,
    #[serde(serialize_with = "serialize_number")]
    pub a: f64,
    #[serde(serialize_with = "serialize_number")]
    pub b: f64,
    #[serde(serialize_with = "serialize_number")]
    pub result: f64,
    #[serde(rename = "traceId")]
    pub trace_id: TraceId,
}

/// Largest integer every f64 represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Integral values go out as JSON integers (`8`, not `8.0`); NaN and the
/// infinities as `null`.
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        serializer.serialize_none()
    } else if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

pub async fn root() -> Json<Welcome> {
    Json(Welcome {
        message: WELCOME_MESSAGE,
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.metrics.render(),
    )
}

/// First value of `key`; repeated keys after it are ignored.
fn first_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// `GET /{op}?a=..&b=..`
pub async fn calculate(
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    Extension(trace_id): Extension<TraceId>,
) -> Result<Json<CalculationResponse>, ApiError> {
    // An undecodable segment or query is not a calculation failure.
    let Path(op) = path.map_err(|rejection| ApiError::Internal {
        detail: rejection.body_text(),
        trace_id,
    })?;
    let Query(params) = query.map_err(|rejection| ApiError::Internal {
        detail: rejection.body_text(),
        trace_id,
    })?;

    let a = first_param(&params, "a");
    let b = first_param(&params, "b");

    match calculator::calculate(&op, a, b) {
        Ok(calc) => Ok(Json(CalculationResponse {
            operation: calc.operation.as_str(),
            a: calc.a,
            b: calc.b,
            result: calc.result,
            trace_id,
        })),
        Err(source) => {
            tracing::error!(
                error = %source,
                operation = %op,
                trace_id = %trace_id,
                "Calculation error"
            );
            Err(ApiError::Calculation { source, trace_id })
        }
    }
}

pub async fn not_found(Extension(trace_id): Extension<TraceId>) -> ApiError {
    ApiError::NotFound { trace_id }
}
