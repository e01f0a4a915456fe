//! Shared utilities for end-to-end tests.

use calculator_api::observability::MetricsAggregator;
use calculator_api::{HttpServer, ServiceConfig, Shutdown};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// A server running on an ephemeral localhost port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub metrics: Arc<MetricsAggregator>,
    handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap().unwrap();
    }
}

/// Bind port 0 on localhost and serve the full application.
pub async fn start_server() -> TestServer {
    let mut config = ServiceConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;

    let listener = TcpListener::bind(config.listener.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new();
    let metrics = server.metrics();
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        shutdown,
        metrics,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
