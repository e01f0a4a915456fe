//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Count requests per path
//! - Accumulate response time per path
//! - Render Prometheus text exposition for the `/metrics` endpoint
//!
//! # Metrics
//! - `http_requests_total` (counter): requests by path
//! - `http_response_time_ms` (gauge): mean response time by path, in ms
//!
//! # Design Decisions
//! - One aggregator per process, owned by the server state and shared via `Arc`
//! - Count and total time live in one entry so they appear together
//! - Paths render in first-seen order
//! - A single mutex: every update is one increment and one add

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, Default)]
struct PathStats {
    count: u64,
    total_ms: f64,
}

impl PathStats {
    fn average_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_ms / self.count as f64
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Paths in first-seen order.
    order: Vec<String>,
    stats: HashMap<String, PathStats>,
}

/// Per-path request counters and cumulative timings.
#[derive(Debug, Default)]
pub struct MetricsAggregator {
    inner: Mutex<Inner>,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Updates are single adds, so a poisoned guard still holds consistent data.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record one completed request for `path`.
    pub fn record(&self, path: &str, elapsed_ms: f64) {
        let elapsed_ms = elapsed_ms.max(0.0);
        let mut guard = self.lock();
        let inner = &mut *guard;

        if let Some(stats) = inner.stats.get_mut(path) {
            stats.count += 1;
            stats.total_ms += elapsed_ms;
            return;
        }

        inner.order.push(path.to_string());
        inner.stats.insert(
            path.to_string(),
            PathStats {
                count: 1,
                total_ms: elapsed_ms,
            },
        );
    }

    /// Requests observed for `path` so far.
    pub fn request_count(&self, path: &str) -> u64 {
        self.lock().stats.get(path).map_or(0, |s| s.count)
    }

    /// Mean response time for `path`, if it has been observed.
    pub fn average_ms(&self, path: &str) -> Option<f64> {
        self.lock().stats.get(path).map(PathStats::average_ms)
    }

    /// Observed paths in first-seen order.
    pub fn paths(&self) -> Vec<String> {
        self.lock().order.clone()
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let inner = self.lock();
        let mut out = String::new();

        let _ = writeln!(out, "# HELP http_requests_total Total number of requests");
        let _ = writeln!(out, "# TYPE http_requests_total counter");
        for (path, stats) in inner.iter() {
            let _ = writeln!(
                out,
                "http_requests_total{{path=\"{}\"}} {}",
                escape_label(path),
                stats.count
            );
        }

        let _ = writeln!(out, "# HELP http_response_time_ms Response time in milliseconds");
        let _ = writeln!(out, "# TYPE http_response_time_ms gauge");
        for (path, stats) in inner.iter() {
            let _ = writeln!(
                out,
                "http_response_time_ms{{path=\"{}\"}} {:.2}",
                escape_label(path),
                stats.average_ms()
            );
        }

        out
    }
}

impl Inner {
    fn iter(&self) -> impl Iterator<Item = (&str, PathStats)> + '_ {
        self.order
            .iter()
            .filter_map(|path| self.stats.get(path).map(|s| (path.as_str(), *s)))
    }
}

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}
