//! Error handling module unit tests

use openai_client::utils::error::helpers::*;
use openai_client::utils::error::*;
use reqwest::StatusCode;

#[test]
fn test_client_error_types() {
    let test_cases = vec![
        (ClientError::Transport(TransportError::Timeout), "timeout_error"),
        (ClientError::Transport(TransportError::Other("reset".to_string())), "transport_error"),
        (ClientError::Encode(serde_json::from_str::<u32>("x").unwrap_err()), "encode_error"),
        (decode_error(200, "bad json"), "decode_error"),
        (multipart_error("unreadable"), "multipart_error"),
        (ClientError::Api { status: 401, message: "denied".to_string() }, "api_error"),
        (config_error("missing key"), "config_error"),
    ];

    for (error, expected_type) in test_cases {
        assert_eq!(error.error_type(), expected_type);
    }
}

#[test]
fn test_error_display() {
    let error = ClientError::Api { status: 429, message: "Rate limit reached".to_string() };
    assert_eq!(error.to_string(), "API error (HTTP 429): Rate limit reached");

    let error = decode_error(200, "missing field");
    assert_eq!(error.to_string(), "Failed to decode response (HTTP 200): missing field");

    let error = ClientError::from(TransportError::Connect("refused".to_string()));
    assert_eq!(error.to_string(), "Transport error: Connection failed: refused");
}

#[test]
fn test_io_errors_become_transport_errors() {
    let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
    let error = ClientError::from(TransportError::from(io));

    assert!(error.is_transport());
    assert!(error.status().is_none());
}

#[test]
fn test_api_error_document() {
    let body = r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota","param":null,"code":"insufficient_quota"}}"#;

    let parsed: ApiErrorResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.error.error_type, "insufficient_quota");
    assert_eq!(parsed.error.code, Some(serde_json::json!("insufficient_quota")));
    assert!(parsed.error.param.is_none());

    assert_eq!(
        parse_error_message(StatusCode::TOO_MANY_REQUESTS, body.as_bytes()),
        "You exceeded your current quota"
    );
}

#[test]
fn test_error_message_fallbacks() {
    assert_eq!(
        parse_error_message(StatusCode::BAD_REQUEST, br#"{"error":{"message":""}}"#),
        r#"{"error":{"message":""}}"#
    );
    assert_eq!(parse_error_message(StatusCode::SERVICE_UNAVAILABLE, b"  "), "Service Unavailable");
}

#[test]
fn test_config_context() {
    let result: Result<u64, std::num::ParseIntError> = "abc".parse::<u64>();
    let error = result.config_context("Invalid timeout").unwrap_err();

    assert_eq!(error.error_type(), "config_error");
    assert!(error.to_string().contains("Invalid timeout"));
}
