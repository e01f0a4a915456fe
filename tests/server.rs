//! End-to-end tests over a real TCP listener.

use serde_json::Value;

mod common;

#[tokio::test]
async fn test_calculation_over_http() {
    let server = common::start_server().await;
    let client = common::client();

    let res = client.get(server.url("/add?a=5&b=3")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let header = res.headers()["x-trace-id"].to_str().unwrap().to_string();
    let raw = res.text().await.unwrap();
    assert_eq!(
        raw,
        format!(r#"{{"operation":"add","a":5,"b":3,"result":8,"traceId":"{header}"}}"#)
    );

    let res = client.get(server.url("/divide?a=10&b=0")).send().await.unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Division by zero");

    server.stop().await;
}

#[tokio::test]
async fn test_metrics_after_concurrent_requests() {
    let server = common::start_server().await;
    let client = common::client();

    let requests: Vec<_> = (0..20)
        .map(|i| {
            let client = client.clone();
            let url = server.url(&format!("/multiply?a={i}&b=2"));
            tokio::spawn(async move { client.get(url).send().await.unwrap().status() })
        })
        .collect();
    for handle in requests {
        assert_eq!(handle.await.unwrap(), 200);
    }

    let res = client.get(server.url("/metrics")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let text = res.text().await.unwrap();
    assert!(text.contains("http_requests_total{path=\"/multiply\"} 20\n"), "{text}");
    assert!(text.contains("http_response_time_ms{path=\"/multiply\"} "));
    assert_eq!(server.metrics.request_count("/multiply"), 20);
    assert_eq!(server.metrics.request_count("/metrics"), 1);

    server.stop().await;
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let server = common::start_server().await;
    let client = common::client();
    let url = server.url("/health");

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 200);

    server.stop().await;

    assert!(client.get(&url).send().await.is_err());
}
