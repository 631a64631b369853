//! Integration tests for `SourceClient::get_text`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no real
//! network traffic is made. Covers the happy path, header passthrough, and
//! every status-mapping variant including retry behavior.

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use clipwatch_scraper::{ScrapeError, SourceClient};

/// 5-second timeout, descriptive UA, no retries.
fn test_client() -> SourceClient {
    SourceClient::new(5, "clipwatch-test/0.1", 0, 0).expect("failed to build test SourceClient")
}

fn test_client_with_retries(max_retries: u32) -> SourceClient {
    SourceClient::new(5, "clipwatch-test/0.1", max_retries, 0)
        .expect("failed to build test SourceClient")
}

#[tokio::test]
async fn get_text_returns_the_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<feed/>"))
        .mount(&server)
        .await;

    let client = test_client();
    let body = client
        .get_text(&format!("{}/feed", server.uri()), &[])
        .await
        .expect("expected Ok");
    assert_eq!(body, "<feed/>");
}

#[tokio::test]
async fn get_text_sends_extra_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .and(header("X-IG-App-ID", "12345"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = test_client();
    let result = client
        .get_text(&format!("{}/api", server.uri()), &[("X-IG-App-ID", "12345")])
        .await;
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
}

#[tokio::test]
async fn not_found_maps_to_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1) // 404 must not be retried
        .mount(&server)
        .await;

    let client = test_client_with_retries(3);
    let result = client
        .get_text(&format!("{}/missing", server.uri()), &[])
        .await;
    assert!(matches!(result, Err(ScrapeError::NotFound { .. })), "got {result:?}");
}

#[tokio::test]
async fn rate_limit_carries_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "120"))
        .mount(&server)
        .await;

    let client = test_client();
    let result = client.get_text(&format!("{}/busy", server.uri()), &[]).await;
    assert!(
        matches!(
            result,
            Err(ScrapeError::RateLimited {
                retry_after_secs: 120,
                ..
            })
        ),
        "got {result:?}"
    );
}

#[tokio::test]
async fn server_error_maps_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client_with_retries(3);
    let result = client
        .get_text(&format!("{}/broken", server.uri()), &[])
        .await;
    assert!(
        matches!(result, Err(ScrapeError::UnexpectedStatus { status: 503, .. })),
        "got {result:?}"
    );
}

#[tokio::test]
async fn rate_limited_requests_are_retried() {
    let server = MockServer::start().await;

    // First two attempts get throttled, the third succeeds.
    Mock::given(method("GET"))
        .and(path("/eventually"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/eventually"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = test_client_with_retries(3);
    let body = client
        .get_text(&format!("{}/eventually", server.uri()), &[])
        .await
        .expect("expected Ok after retries");
    assert_eq!(body, "ok");
}
