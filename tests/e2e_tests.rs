//! End-to-end library tests: configuration to resolved target to probing
//! session to rendered report, against local servers only

use std::sync::Arc;
use std::time::Duration;
use tcping::{
    client::ProberFactory,
    executor::Session,
    models::{Config, ProbeOutcome, SessionSettings, Target},
    output::OutputFormatterFactory,
    types::ProbeStatus,
    AppError,
};
use tokio::net::TcpListener;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn fast_settings(counter: u32) -> SessionSettings {
    SessionSettings::new(counter, Duration::from_millis(10), Duration::from_secs(2)).unwrap()
}

async fn spawn_listener() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            drop(socket);
        }
    });
    port
}

#[tokio::test]
async fn test_tcp_session_end_to_end() {
    let port = spawn_listener().await;
    let target = Target::resolve(&format!("127.0.0.1:{}", port), None, &fast_settings(3)).unwrap();
    let prober = ProberFactory::create(&target).unwrap();
    let session = Session::new(target, prober);
    let formatter = OutputFormatterFactory::create_formatter(false);

    let mut lines = Vec::new();
    let result = session
        .run(|seq, outcome, _| lines.push(formatter.format_probe(seq, session.target(), outcome)))
        .await;

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with(&format!("Ping tcp://127.0.0.1:{} - Connected - seq=1 time=", port)));
    assert_eq!(result.counter(), 3);
    assert_eq!(result.success_counter(), 3);
    assert!(result.is_reachable());

    let report = formatter.format_report(&result);
    assert!(report.starts_with(&format!("--- 127.0.0.1:{} ping statistics ---", port)));
    assert!(report.contains("3 responses, 3 ok, 0.00% failed"));
}

#[tokio::test]
async fn test_http_session_reports_diagnostic_tag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let raw = format!("{}/status", server.uri());
    let target = Target::resolve(&raw, None, &fast_settings(2)).unwrap();
    let session = Session::new(target.clone(), ProberFactory::create(&target).unwrap());

    let result = session.run(|_, _, _| {}).await;
    let report = result.render();
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(lines[0], "HTTP/1.1 200 OK");
    assert_eq!(lines[1], format!("--- {} ping statistics ---", target));
    assert_eq!(lines[2], "2 responses, 2 ok, 0.00% failed");
}

#[tokio::test]
async fn test_mixed_http_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let target = Target::resolve(&server.uri(), None, &fast_settings(4)).unwrap();
    let session = Session::new(target.clone(), ProberFactory::create(&target).unwrap());

    let mut statuses = Vec::new();
    let result = session.run(|_, outcome, _| statuses.push(outcome.status)).await;

    assert_eq!(statuses[0], ProbeStatus::Failed);
    assert!(statuses[1..].iter().all(|s| *s == ProbeStatus::Success));
    assert_eq!(result.failure_rate(), "25.00%");
}

#[tokio::test]
async fn test_unbounded_session_stops_on_signal() {
    let port = spawn_listener().await;
    let target = Target::resolve(&format!("127.0.0.1:{}", port), None, &fast_settings(0)).unwrap();
    let session = Session::new(target.clone(), ProberFactory::create(&target).unwrap());
    let handle = session.stop_handle();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(120)).await;
        handle.stop();
    });

    let result = session.run(|_, _, _| {}).await;
    assert!(result.counter() >= 1);
    assert_eq!(result.counter(), result.success_counter());
}

#[test]
fn test_config_drives_target_settings() {
    let mut config = Config::default();
    config.counter = 7;
    config.interval_ms = 250;
    config.timeout_ms = 1500;
    config.validate().unwrap();

    let target = Target::resolve("https://example.com:8443/health", None, &config.session_settings().unwrap()).unwrap();
    assert_eq!(target.counter(), 7);
    assert_eq!(target.interval(), Duration::from_millis(250));
    assert_eq!(target.timeout(), Duration::from_millis(1500));
    assert_eq!(target.port(), 8443);
    assert_eq!(target.request_url().unwrap().as_str(), "https://example.com:8443/health");
}

#[test]
fn test_address_errors_abort_before_probing() {
    let settings = SessionSettings::default();

    let malformed = Target::resolve("not a host!!", None, &settings).unwrap_err();
    assert!(matches!(malformed, AppError::MalformedAddress(_)));

    let unsupported = Target::resolve("ftp://host.com", None, &settings).unwrap_err();
    assert!(matches!(unsupported, AppError::UnsupportedProtocol(_)));
    assert_eq!(unsupported.exit_code(), 1);
}

#[test]
fn test_shared_target_in_result() {
    let target = Arc::new(Target::resolve("10.0.0.5", None, &SessionSettings::default()).unwrap());
    let mut result = tcping::PingResult::new(target.clone());
    result.fold(&ProbeOutcome::success(Duration::from_millis(5), None));
    assert_eq!(result.target(), target.as_ref());
}
