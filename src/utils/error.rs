//! Error handling module
//!
//! Defines the error types shared by the wire codec, the HTTP transport and
//! the dispatch layer

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Faults raised by the HTTP transport before a response could be read
#[derive(Error, Debug)]
pub enum TransportError {
    /// Could not establish a connection to the remote host
    #[error("Connection failed: {0}")]
    Connect(String),

    /// The request did not complete within the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// Low level I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other transport failure
    #[error("Transport error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_connect() {
            TransportError::Connect(error.to_string())
        } else {
            TransportError::Other(error.to_string())
        }
    }
}

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// The transport failed before a response was received
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Request serialization failed
    #[error("Serialization error: {0}")]
    Encode(#[from] serde_json::Error),

    /// A successful response body could not be decoded
    #[error("Failed to decode response (HTTP {status}): {message}")]
    Decode {
        status: u16,
        message: String,
    },

    /// Multipart body construction failed
    #[error("Multipart encoding failed: {0}")]
    Multipart(String),

    /// The API answered with a non-success status
    #[error("API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        message: String,
    },

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Get error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ClientError::Transport(TransportError::Timeout) => "timeout_error",
            ClientError::Transport(_) => "transport_error",
            ClientError::Encode(_) => "encode_error",
            ClientError::Decode { .. } => "decode_error",
            ClientError::Multipart(_) => "multipart_error",
            ClientError::Api { .. } => "api_error",
            ClientError::Config(_) => "config_error",
        }
    }

    /// HTTP status associated with the error, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Decode { status, .. } | ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server was never reached
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

/// API error document (`{"error": {...}}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Error information
    pub error: ApiErrorBody,
}

/// API error body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiErrorBody {
    /// Error message
    pub message: String,
    /// Error type
    #[serde(rename = "type")]
    pub error_type: String,
    /// Offending parameter (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// Error code, a string or a number depending on the endpoint (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<serde_json::Value>,
}

/// Extract a human readable message from a non-success response body
///
/// Falls back to the raw body, then to the canonical reason phrase.
pub fn parse_error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ApiErrorResponse>(body) {
        let message = parsed.error.message.trim();
        if !message.is_empty() {
            return message.to_string();
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        text.to_string()
    }
}

/// Result type alias
pub type ClientResult<T> = Result<T, ClientError>;

/// Error handling helper functions
pub mod helpers {
    use super::*;

    /// Create configuration error
    pub fn config_error(message: impl Into<String>) -> ClientError {
        ClientError::Config(message.into())
    }

    /// Create multipart error
    pub fn multipart_error(message: impl Into<String>) -> ClientError {
        ClientError::Multipart(message.into())
    }

    /// Create decode error
    pub fn decode_error(status: u16, message: impl Into<String>) -> ClientError {
        ClientError::Decode {
            status,
            message: message.into(),
        }
    }
}

/// Error context extension trait
pub trait ErrorContext<T> {
    /// Add configuration error context
    fn config_context(self, message: &str) -> ClientResult<T>;

    /// Add multipart error context
    fn multipart_context(self, message: &str) -> ClientResult<T>;

    /// Add decode error context
    fn decode_context(self, status: u16, message: &str) -> ClientResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn config_context(self, message: &str) -> ClientResult<T> {
        self.map_err(|e| ClientError::Config(format!("{}: {}", message, e)))
    }

    fn multipart_context(self, message: &str) -> ClientResult<T> {
        self.map_err(|e| ClientError::Multipart(format!("{}: {}", message, e)))
    }

    fn decode_context(self, status: u16, message: &str) -> ClientResult<T> {
        self.map_err(|e| ClientError::Decode {
            status,
            message: format!("{}: {}", message, e),
        })
    }
}
