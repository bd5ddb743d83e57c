//! Tests for the homepage liveness prober
//!
//! The prober must never fail past its own boundary: bad input yields an
//! error result without network traffic, and transport failures yield an
//! error result carrying the configured timeout.

use std::time::{Duration, Instant};

use folio_api::portfolio::models::DeploymentStatus;
use folio_api::portfolio::probe::LivenessProber;
use mockito::Matcher;

/// An empty candidate URL is rejected without making any request.
#[tokio::test]
async fn test_empty_url_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let catch_all = server
        .mock("HEAD", Matcher::Any)
        .with_status(200)
        .expect(0)
        .create_async()
        .await;

    let prober = LivenessProber::new();
    let result = prober.probe("   ").await;

    assert_eq!(result.status, DeploymentStatus::Error);
    assert_eq!(result.response_time_ms, 0);
    catch_all.assert_async().await;
}

/// An unparsable candidate URL is rejected without making any request.
#[tokio::test]
async fn test_invalid_url_makes_no_request() {
    let prober = LivenessProber::new();
    let result = prober.probe("not a url at all").await;

    assert_eq!(result.status, DeploymentStatus::Error);
    assert_eq!(result.response_time_ms, 0);
}

/// A reachable endpoint answering with a success status probes as active.
#[tokio::test]
async fn test_reachable_endpoint_is_active() {
    let mut server = mockito::Server::new_async().await;
    let head = server
        .mock("HEAD", "/")
        .with_status(200)
        .create_async()
        .await;

    let prober = LivenessProber::new();
    let result = prober.probe(&server.url()).await;

    assert_eq!(result.status, DeploymentStatus::Active);
    assert!(
        result.response_time_ms < 5_000,
        "Elapsed time must be below the timeout for a live endpoint"
    );
    head.assert_async().await;
}

/// A reachable endpoint answering with a failure status probes as error,
/// still reporting the measured elapsed time.
#[tokio::test]
async fn test_unhealthy_endpoint_is_error() {
    let mut server = mockito::Server::new_async().await;
    let _head = server
        .mock("HEAD", "/")
        .with_status(503)
        .create_async()
        .await;

    let prober = LivenessProber::new();
    let result = prober.probe(&server.url()).await;

    assert_eq!(result.status, DeploymentStatus::Error);
    assert!(result.response_time_ms < 5_000);
}

/// An endpoint that accepts the connection but never answers trips the
/// per-probe timeout; the result reports the timeout, not a longer wait.
#[tokio::test]
async fn test_silent_endpoint_times_out() {
    // The listener's backlog accepts the TCP connection; no HTTP response
    // ever arrives.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let url = format!("http://{}/", addr);

    let timeout = Duration::from_millis(250);
    let prober = LivenessProber::with_timeout(timeout);

    let start = Instant::now();
    let result = prober.probe(&url).await;
    let waited = start.elapsed();

    assert_eq!(result.status, DeploymentStatus::Error);
    assert_eq!(result.response_time_ms, 250);
    assert!(
        waited >= timeout,
        "Probe must not give up before its timeout, waited {:?}",
        waited
    );
    assert!(
        waited < Duration::from_secs(5),
        "Probe must return promptly after its own timeout, waited {:?}",
        waited
    );

    drop(listener);
}

/// A connection refused outright is also converted into an error result.
#[tokio::test]
async fn test_unreachable_endpoint_is_error() {
    // Bind then drop to obtain a port that refuses connections.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let prober = LivenessProber::with_timeout(Duration::from_millis(500));
    let result = prober.probe(&format!("http://{}/", addr)).await;

    assert_eq!(result.status, DeploymentStatus::Error);
    assert_eq!(result.response_time_ms, 500);
}
