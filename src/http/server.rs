//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request lifecycle)
//! - Bind server to listener and serve until shutdown

use axum::{extract::Request, http::Uri, middleware, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::request::request_lifecycle;
use crate::observability::MetricsAggregator;

/// Application state injected into handlers.
#[derive(Clone, Default)]
pub struct AppState {
    pub metrics: Arc<MetricsAggregator>,
}

impl AppState {
    pub fn new(metrics: Arc<MetricsAggregator>) -> Self {
        Self { metrics }
    }
}

/// Fixed routes, matched without regard to case.
const LITERAL_ROUTES: [&str; 3] = ["/", "/health", "/metrics"];

/// Routing form of `path`: one trailing slash dropped, and a case-insensitive
/// hit on a fixed route folded to its canonical spelling. `None` when the
/// path already routes as-is.
///
/// Operation segments keep their case, so `/ADD` stays an unknown operation.
pub fn normalize_route_path(path: &str) -> Option<String> {
    let trimmed = match path.strip_suffix('/') {
        Some(rest) if !rest.is_empty() => rest,
        _ => path,
    };
    let routed = LITERAL_ROUTES
        .iter()
        .find(|route| route.eq_ignore_ascii_case(trimmed))
        .map_or(trimmed, |route| *route);

    (routed != path).then(|| routed.to_string())
}

/// Rewrite the request URI to its routing form, keeping the query string.
async fn normalize_route(mut request: Request) -> Request {
    let uri = request.uri();
    if let Some(path) = normalize_route_path(uri.path()) {
        let path_and_query = match uri.query() {
            Some(query) => format!("{path}?{query}"),
            None => path,
        };
        if let Ok(rewritten) = path_and_query.parse::<Uri>() {
            *request.uri_mut() = rewritten;
        }
    }
    request
}

/// Build the Axum router with all middleware layers.
///
/// Literal routes win over `/{op}`, so `/health` and `/metrics` never reach
/// the calculator. The lifecycle middleware sees the path as the client sent
/// it; routing sees the normalized one.
pub fn build_router(state: AppState) -> Router {
    let lifecycle = middleware::from_fn_with_state(state.metrics.clone(), request_lifecycle);

    let routes = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/{op}", get(handlers::calculate))
        .fallback(handlers::not_found)
        .with_state(state);

    let service = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(lifecycle)
        .layer(middleware::map_request(normalize_route))
        .service(routes);

    Router::new().fallback_service(service)
}

/// HTTP server for the calculator API.
pub struct HttpServer {
    router: Router,
    metrics: Arc<MetricsAggregator>,
}

impl HttpServer {
    /// Create a server with a fresh metrics aggregator.
    pub fn new() -> Self {
        let metrics = Arc::new(MetricsAggregator::new());
        let router = build_router(AppState::new(metrics.clone()));
        Self { router, metrics }
    }

    /// The router, for embedding or driving without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The aggregator behind `/metrics`.
    pub fn metrics(&self) -> Arc<MetricsAggregator> {
        self.metrics.clone()
    }

    /// Serve on `listener` until a shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}
