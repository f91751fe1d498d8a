//! Tests for the HTTP transport module

use super::*;
use crate::auth::AuthContext;
use crate::error::Error;
use crate::types::StringMap;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url(server: &MockServer, path: &str) -> String {
    format!("{}{path}", server.uri())
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert!(config.timeout.is_none());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("dirpager/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(15))
        .rate_limit(RateLimiterConfig::per_second(4))
        .header("ConsistencyLevel", "eventual")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Some(Duration::from_secs(15)));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(4, 4)));
    assert_eq!(
        config.default_headers.get("ConsistencyLevel"),
        Some(&"eventual".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_client_flags() {
    let client = HttpClient::new().unwrap();
    assert!(!client.is_authenticated());
    assert!(!client.has_rate_limiter());

    let client = HttpClient::with_auth(HttpClientConfig::default(), AuthContext::anonymous())
        .unwrap();
    assert!(!client.is_authenticated());

    let config = HttpClientConfig::builder()
        .rate_limit(RateLimiterConfig::per_second(2))
        .build();
    let client = HttpClient::with_auth(config, AuthContext::bearer("t")).unwrap();
    assert!(client.is_authenticated());
    assert!(client.has_rate_limiter());
}

#[tokio::test]
async fn test_get_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/deviceManagement/managedDevices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "value": [{"id": "d1"}]
        })))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let body = client
        .get_json(&url(&mock_server, "/deviceManagement/managedDevices"), None, None)
        .await
        .unwrap();

    assert_eq!(body["value"][0]["id"], "d1");
}

#[tokio::test]
async fn test_authenticated_client_attaches_context() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(header("Authorization", "Bearer ctx-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        HttpClient::with_auth(HttpClientConfig::default(), AuthContext::bearer("ctx-token"))
            .unwrap();
    client
        .get_json(&url(&mock_server, "/users"), None, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_explicit_headers_attached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups"))
        .and(header("Authorization", "Bearer raw-token"))
        .and(header("ConsistencyLevel", "eventual"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .header("ConsistencyLevel", "eventual")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let mut headers = StringMap::new();
    headers.insert("Authorization".to_string(), "Bearer raw-token".to_string());
    client
        .get_json(&url(&mock_server, "/groups"), Some(&headers), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_credential_header_sent_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})))
        .expect(2)
        .mount(&mock_server)
        .await;

    // A stale default header is overridden by the client's credentials
    let config = HttpClientConfig::builder()
        .header("authorization", "Bearer stale")
        .build();
    let client = HttpClient::with_auth(config, AuthContext::bearer("fresh")).unwrap();
    client
        .get_json(&url(&mock_server, "/devices"), None, None)
        .await
        .unwrap();

    // Raw dispatch headers override the client's credentials
    let mut headers = StringMap::new();
    headers.insert("Authorization".to_string(), "Bearer raw".to_string());
    client
        .get_json(&url(&mock_server, "/devices"), Some(&headers), None)
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let sent: Vec<Vec<String>> = requests
        .iter()
        .map(|r| {
            r.headers
                .get_all("authorization")
                .iter()
                .map(|v| v.to_str().unwrap().to_string())
                .collect()
        })
        .collect();

    assert_eq!(
        sent,
        vec![vec!["Bearer fresh".to_string()], vec!["Bearer raw".to_string()]]
    );
}

#[tokio::test]
async fn test_invalid_header_name_is_config_error() {
    let mut headers = StringMap::new();
    headers.insert("Bad Header".to_string(), "x".to_string());

    let client = HttpClient::new().unwrap();
    let err = client
        .get_json("http://127.0.0.1:1/devices", Some(&headers), None)
        .await
        .unwrap_err();
    assert!(err.is_config());
}

#[tokio::test]
async fn test_throttled_client_still_sends_every_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"value": []})))
        .expect(3)
        .mount(&mock_server)
        .await;

    // Burst of one at 20 rps: the later requests wait instead of failing
    let config = HttpClientConfig::builder()
        .rate_limit(RateLimiterConfig::new(20, 1))
        .build();
    let client = HttpClient::with_config(config).unwrap();

    for _ in 0..3 {
        client
            .get_json(&url(&mock_server, "/devices"), None, None)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_non_success_status_is_request_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/devices"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let err = client
        .get_json(&url(&mock_server, "/devices"), None, None)
        .await
        .unwrap_err();

    match &err {
        Error::Request {
            url,
            status,
            message,
            ..
        } => {
            assert_eq!(url, &format!("{}/devices", mock_server.uri()));
            assert_eq!(*status, Some(403));
            assert!(message.contains("Forbidden"));
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let err = client
        .get_json(&url(&mock_server, "/flaky"), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let err = client
        .get_json(&url(&mock_server, "/html"), None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_request_timeout_is_request_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"value": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let err = client
        .get_json(&url(&mock_server, "/slow"), None, Some(Duration::from_millis(100)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Request { status: None, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    let client = HttpClient::new().unwrap();
    let err = client
        .get_json("http://127.0.0.1:1/devices", None, Some(Duration::from_secs(2)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Request { .. }));
    assert_eq!(err.url(), Some("http://127.0.0.1:1/devices"));
}
