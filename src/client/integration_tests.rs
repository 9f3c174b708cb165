//! Prober tests against local listeners and mock HTTP servers

use super::*;
use crate::models::SessionSettings;
use crate::types::ProbeStatus;
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn settings(timeout: Duration) -> SessionSettings {
    SessionSettings::new(1, Duration::from_millis(10), timeout).unwrap()
}

fn target(raw: &str, timeout: Duration) -> Target {
    Target::resolve(raw, None, &settings(timeout)).unwrap()
}

/// Address of a local port that nothing listens on
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

#[tokio::test]
async fn test_tcp_probe_connects() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });

    let target = target(&format!("tcp://127.0.0.1:{}", port), Duration::from_secs(2));
    let outcome = TcpProber::new().probe(&target).await;

    assert_eq!(outcome.status, ProbeStatus::Success);
    assert!(outcome.diagnostic.is_none());
    assert!(outcome.elapsed < Duration::from_secs(2));
}

#[tokio::test]
async fn test_tcp_probe_refused() {
    let port = closed_port().await;
    let target = target(&format!("127.0.0.1:{}", port), Duration::from_secs(2));

    let outcome = TcpProber::new().probe(&target).await;
    assert_eq!(outcome.status, ProbeStatus::Refused);
    assert!(!outcome.is_successful());
}

#[tokio::test]
async fn test_http_probe_success_reports_status_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .and(header("user-agent", format!("tcping/{}", crate::VERSION).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let target = target(&format!("{}/health", server.uri()), Duration::from_secs(2));
    let prober = HttpProber::new(target.timeout()).unwrap();
    let outcome = prober.probe(&target).await;

    assert_eq!(outcome.status, ProbeStatus::Success);
    assert_eq!(outcome.diagnostic.as_deref(), Some("HTTP/1.1 200 OK"));
}

#[tokio::test]
async fn test_http_probe_non_2xx_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let target = target(&server.uri(), Duration::from_secs(2));
    let outcome = HttpProber::new(target.timeout()).unwrap().probe(&target).await;

    assert_eq!(outcome.status, ProbeStatus::Failed);
    assert_eq!(outcome.error_message.as_deref(), Some("HTTP status 503"));
    assert!(outcome.diagnostic.is_none());
}

#[tokio::test]
async fn test_http_probe_follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let target = target(&format!("{}/old", server.uri()), Duration::from_secs(2));
    let outcome = HttpProber::new(target.timeout()).unwrap().probe(&target).await;

    assert_eq!(outcome.status, ProbeStatus::Success);
    assert_eq!(outcome.diagnostic.as_deref(), Some("HTTP/1.1 204 No Content"));
}

#[tokio::test]
async fn test_http_probe_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let target = target(&server.uri(), Duration::from_millis(200));
    let outcome = HttpProber::new(target.timeout()).unwrap().probe(&target).await;

    assert_eq!(outcome.status, ProbeStatus::Timeout);
    assert_eq!(outcome.elapsed, Duration::from_millis(200));
}

#[tokio::test]
async fn test_http_probe_refused() {
    let port = closed_port().await;
    let target = target(&format!("http://127.0.0.1:{}/", port), Duration::from_secs(2));

    let outcome = HttpProber::new(target.timeout()).unwrap().probe(&target).await;
    assert_eq!(outcome.status, ProbeStatus::Refused);
}

#[tokio::test]
async fn test_http_probe_uses_port_override() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ready"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let port = server.address().port();

    let target = Target::resolve(
        "http://127.0.0.1:1/ready",
        Some(port),
        &settings(Duration::from_secs(2)),
    )
    .unwrap();
    let outcome = HttpProber::new(target.timeout()).unwrap().probe(&target).await;

    assert_eq!(outcome.status, ProbeStatus::Success);
}
