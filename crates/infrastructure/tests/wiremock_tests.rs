//! Integration tests for infrastructure crate
//!
//! Tests cover:
//! - Header-propagating HTTP client with wiremock
//! - Configuration loading

use std::time::Duration;

use application::{PropagationHeaders, RequestContext, RequestMetadata};
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use infrastructure::{PropagatingClientConfig, PropagatingHttpClient, RequestBuilderExt};

fn inbound_context(pairs: &'static [(&'static str, &'static str)]) -> RequestContext {
    let headers = PropagationHeaders::capture(|name| {
        pairs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| (*v).to_string())
    });
    let metadata = RequestMetadata {
        request_id: "req-42",
        operation: "/message/1",
        ..RequestMetadata::default()
    };
    RequestContext::new(&metadata, headers)
}

// ============================================================================
// Propagating HTTP Client Tests
// ============================================================================

mod propagating_client_tests {
    use super::*;

    #[tokio::test]
    async fn client_with_config_succeeds() {
        let config = PropagatingClientConfig::default()
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("Test-Agent/1.0");

        assert!(PropagatingHttpClient::with_config(config).is_ok());
    }

    #[tokio::test]
    async fn get_request_sends_to_server() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/test"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = PropagatingHttpClient::new().unwrap();
        let response = client
            .get(format!("{}/test", mock_server.uri()))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn request_forwards_trace_headers() {
        let mock_server = MockServer::start().await;
        let ctx = inbound_context(&[
            ("x-b3-traceid", "463ac35c9f6413ad"),
            ("x-b3-spanid", "a2fb4a1d1a96d312"),
            ("requestid", "req-42"),
        ]);

        Mock::given(method("POST"))
            .and(path("/downstream"))
            .and(header("x-b3-traceid", "463ac35c9f6413ad"))
            .and(header("x-b3-spanid", "a2fb4a1d1a96d312"))
            .and(header("requestid", "req-42"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = PropagatingHttpClient::new().unwrap();
        let response = client
            .post(format!("{}/downstream", mock_server.uri()))
            .with_context(&ctx)
            .json(&serde_json::json!({"text": "hi"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
    }

    #[tokio::test]
    async fn empty_headers_are_not_forwarded() {
        let mock_server = MockServer::start().await;
        let ctx = inbound_context(&[("x-request-id", "x1")]);

        Mock::given(method("GET"))
            .and(path("/sparse"))
            .and(header_exists("x-request-id"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = PropagatingHttpClient::new().unwrap();
        client
            .get(format!("{}/sparse", mock_server.uri()))
            .with_context(&ctx)
            .send()
            .await
            .unwrap();

        let received: Vec<Request> = mock_server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert!(!received[0].headers.contains_key("x-b3-traceid"));
        assert!(!received[0].headers.contains_key("requestid"));
    }

    #[tokio::test]
    async fn inbound_user_agent_overrides_default() {
        let mock_server = MockServer::start().await;
        let ctx = inbound_context(&[("User-Agent", "caller/2.0")]);

        Mock::given(method("GET"))
            .and(header("user-agent", "caller/2.0"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = PropagatingHttpClient::new().unwrap();
        client
            .get(mock_server.uri())
            .with_context(&ctx)
            .send()
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn plain_reqwest_builder_extension() {
        let mock_server = MockServer::start().await;
        let ctx = inbound_context(&[("x-ot-span-context", "ctx-1")]);

        Mock::given(method("DELETE"))
            .and(header("x-ot-span-context", "ctx-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = reqwest::Client::new()
            .delete(mock_server.uri())
            .with_context(&ctx)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 204);
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&mock_server)
            .await;

        let client = PropagatingHttpClient::new().unwrap();
        let err = client
            .get(mock_server.uri())
            .timeout(Duration::from_millis(50))
            .send()
            .await
            .unwrap_err();

        assert!(err.is_timeout());
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config_tests {
    use infrastructure::config::{AppConfig, LegacyEnv, LogFormat};

    #[test]
    fn explicit_environment_is_isolated_from_process() {
        let config = AppConfig::load_from(Some(config::Map::new()), LegacyEnv::default()).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Text);
    }
}
