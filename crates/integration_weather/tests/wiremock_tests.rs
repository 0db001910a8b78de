//! Integration tests for the WeatherAPI client using wiremock
//!
//! These tests verify the client's behavior against a mock HTTP server,
//! ensuring proper handling of the provider's answers.

use std::time::Duration;

use integration_weather::{WeatherApiClient, WeatherClient, WeatherConfig, WeatherError};
use reqwest::header::{HeaderMap, HeaderValue};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

/// Sample WeatherAPI `current.json` answer
fn sample_current_response(temp_c: f64) -> serde_json::Value {
    serde_json::json!({
        "location": {
            "name": "Sao Paulo",
            "region": "Sao Paulo",
            "country": "Brazil",
            "lat": -23.53,
            "lon": -46.62,
            "tz_id": "America/Sao_Paulo",
            "localtime": "2024-01-15 12:00"
        },
        "current": {
            "last_updated": "2024-01-15 12:00",
            "temp_c": temp_c,
            "temp_f": temp_c * 9.0 / 5.0 + 32.0,
            "is_day": 1,
            "condition": { "text": "Partly cloudy", "code": 1003 },
            "humidity": 62
        }
    })
}

fn create_test_client(mock_server: &MockServer) -> WeatherApiClient {
    let config = WeatherConfig {
        base_url: mock_server.uri(),
        timeout_secs: 2,
        connect_timeout_secs: 1,
    };
    #[allow(clippy::expect_used)]
    WeatherApiClient::new(config).expect("Failed to create client")
}

async fn setup_current_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

// ============================================================================
// Success scenarios
// ============================================================================

#[tokio::test]
async fn test_current_weather_success() {
    let mock_server = MockServer::start().await;
    setup_current_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_current_response(25.0)),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.current("São Paulo", "key", HeaderMap::new()).await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
    assert!((result.unwrap().temp_c - 25.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_query_and_key_are_sent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "São Paulo"))
        .and(query_param("key", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response(20.0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let result = client.current("São Paulo", "abc123", HeaderMap::new()).await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
}

#[tokio::test]
async fn test_trace_headers_are_forwarded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(header(
            "traceparent",
            "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current_response(20.0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(
        "traceparent",
        HeaderValue::from_static("00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"),
    );

    let client = create_test_client(&mock_server);
    assert!(client.current("Recife", "key", headers).await.is_ok());
}

#[tokio::test]
async fn test_zero_celsius_is_a_valid_reading() {
    let mock_server = MockServer::start().await;
    setup_current_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_current_response(0.0)),
    )
    .await;

    let client = create_test_client(&mock_server);
    let conditions = client
        .current("Curitiba", "key", HeaderMap::new())
        .await
        .unwrap();

    assert!(conditions.temp_c.abs() < f64::EPSILON);
}

// ============================================================================
// Error handling scenarios
// ============================================================================

#[tokio::test]
async fn test_invalid_key_is_unauthorized() {
    let mock_server = MockServer::start().await;
    setup_current_mock(
        &mock_server,
        ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "code": 2006, "message": "API key is invalid." }
        })),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.current("Recife", "bad", HeaderMap::new()).await;

    assert!(
        matches!(result, Err(WeatherError::Unauthorized(401))),
        "Expected Unauthorized, got: {result:?}"
    );
}

#[tokio::test]
async fn test_disabled_key_is_unauthorized() {
    let mock_server = MockServer::start().await;
    setup_current_mock(&mock_server, ResponseTemplate::new(403)).await;

    let client = create_test_client(&mock_server);
    let result = client.current("Recife", "disabled", HeaderMap::new()).await;

    assert!(matches!(result, Err(WeatherError::Unauthorized(403))));
}

#[tokio::test]
async fn test_answer_without_reading_is_missing_reading() {
    let mock_server = MockServer::start().await;
    setup_current_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "location": {} })),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.current("Recife", "key", HeaderMap::new()).await;

    assert!(matches!(result, Err(WeatherError::MissingReading)));
}

#[tokio::test]
async fn test_unknown_location_is_rejected_with_provider_message() {
    let mock_server = MockServer::start().await;
    setup_current_mock(
        &mock_server,
        ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.current("Nowhere", "key", HeaderMap::new()).await;

    match result {
        Err(WeatherError::Rejected { status, message }) => {
            assert_eq!(status, 400);
            assert_eq!(message, "No matching location found.");
        },
        other => panic!("Expected Rejected, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_returns_service_unavailable() {
    let mock_server = MockServer::start().await;
    setup_current_mock(
        &mock_server,
        ResponseTemplate::new(500).set_body_string("Internal Server Error"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.current("Recife", "key", HeaderMap::new()).await;

    assert!(
        matches!(result, Err(WeatherError::ServiceUnavailable(_))),
        "Expected ServiceUnavailable, got: {result:?}"
    );
}

#[tokio::test]
async fn test_rate_limit_error() {
    let mock_server = MockServer::start().await;
    setup_current_mock(&mock_server, ResponseTemplate::new(429)).await;

    let client = create_test_client(&mock_server);
    let result = client.current("Recife", "key", HeaderMap::new()).await;

    assert!(matches!(result, Err(WeatherError::RateLimitExceeded)));
}

#[tokio::test]
async fn test_invalid_json_returns_parse_error() {
    let mock_server = MockServer::start().await;
    setup_current_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_string("not valid json"),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.current("Recife", "key", HeaderMap::new()).await;

    assert!(matches!(result, Err(WeatherError::ParseError(_))));
}

#[tokio::test]
async fn test_timeout_is_request_failure() {
    let mock_server = MockServer::start().await;
    setup_current_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(sample_current_response(25.0))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let client = create_test_client(&mock_server);
    let result = client.current("Recife", "key", HeaderMap::new()).await;

    assert!(matches!(result, Err(WeatherError::RequestFailed(_))));
}

#[tokio::test]
async fn test_timeout_error_does_not_expose_api_key() {
    let mock_server = MockServer::start().await;
    setup_current_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(sample_current_response(25.0))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client
        .current("Recife", "SUPERSECRETKEY", HeaderMap::new())
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::RequestFailed(_)));
    assert!(!err.to_string().contains("SUPERSECRETKEY"), "leaked: {err}");
    assert!(!err.to_string().contains("key="), "leaked: {err}");
}

#[tokio::test]
async fn test_unreachable_host_error_does_not_expose_api_key() {
    let config = WeatherConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_secs: 2,
        connect_timeout_secs: 1,
    };
    let client = WeatherApiClient::new(config).unwrap();

    let err = client
        .current("Recife", "SUPERSECRETKEY", HeaderMap::new())
        .await
        .unwrap_err();

    assert!(!err.to_string().contains("SUPERSECRETKEY"), "leaked: {err}");
}
