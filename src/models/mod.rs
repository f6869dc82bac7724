//! Data models module
//!
//! Request and response structures for every endpoint family, plus the
//! traits the dispatch layer uses to send them

use crate::codec::{self, EncodedMultipart};
use crate::utils::error::ClientResult;
use reqwest::Method;
use serde::Serialize;
use std::fmt;

pub mod audio;
pub mod chat;
pub mod common;
pub mod completion;
pub mod edit;
pub mod embedding;
pub mod file;
pub mod image;
pub mod model;
pub mod moderation;
pub mod upload;

pub use audio::*;
pub use chat::*;
pub use common::*;
pub use completion::*;
pub use edit::*;
pub use embedding::*;
pub use file::*;
pub use image::*;
pub use model::*;
pub use moderation::*;
pub use upload::FileUpload;

/// Encoded request body
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body (GET/DELETE endpoints)
    Empty,
    /// `application/json` body
    Json(Vec<u8>),
    /// `multipart/form-data` body
    Multipart(EncodedMultipart),
}

impl RequestBody {
    /// Encode a value as a JSON body
    pub fn json<T: Serialize>(value: &T) -> ClientResult<Self> {
        Ok(RequestBody::Json(codec::to_json_bytes(value)?))
    }

    /// Value of the `Content-Type` header, if the body has one
    pub fn content_type(&self) -> Option<String> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some("application/json".to_string()),
            RequestBody::Multipart(encoded) => Some(encoded.content_type()),
        }
    }

    /// Consume into raw bytes
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RequestBody::Empty => Vec::new(),
            RequestBody::Json(bytes) => bytes,
            RequestBody::Multipart(encoded) => encoded.body,
        }
    }
}

/// Endpoint path relative to the API base URL
///
/// Route segments are fixed by the endpoint; parameter segments carry
/// caller-supplied ids and are percent-encoded as a single segment when the
/// URL is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    /// Path made of the `/`-separated segments of `route`
    pub fn new(route: &str) -> Self {
        Self {
            segments: Vec::new(),
        }
        .route(route)
    }

    /// Append fixed route segments
    pub fn route(mut self, route: &str) -> Self {
        self.segments.extend(
            route
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string),
        );
        self
    }

    /// Append one caller-supplied segment, kept whole even if it contains `/`
    pub fn param(mut self, value: impl Into<String>) -> Self {
        self.segments.push(value.into());
        self
    }

    /// Raw, unencoded segments
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for ApiPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

/// A parsed response payload
pub trait ApiResponse: Default + Send + Sized + 'static {
    /// Decode a 2xx response body
    fn from_body(status: u16, body: &[u8]) -> ClientResult<Self>;

    /// Decode a non-2xx response body, degrading to a typed default
    fn from_error_body(body: &[u8]) -> Self;
}

/// Implements [`ApiResponse`] for payloads carried as JSON documents
macro_rules! json_response {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::models::ApiResponse for $ty {
                fn from_body(status: u16, body: &[u8]) -> $crate::utils::error::ClientResult<Self> {
                    $crate::codec::from_json(status, body)
                }

                fn from_error_body(body: &[u8]) -> Self {
                    $crate::codec::from_json_lenient(body)
                }
            }
        )*
    };
}
pub(crate) use json_response;

/// A request that can be dispatched to one endpoint
pub trait ApiRequest: Send + Sync + 'static {
    /// Parsed payload of a response to this request
    type Response: ApiResponse;

    /// Endpoint name used in logs
    const ENDPOINT: &'static str;

    /// HTTP method
    fn method(&self) -> Method {
        Method::POST
    }

    /// Path relative to the API base URL
    fn path(&self) -> ApiPath;

    /// Query parameters
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Encode the request body
    fn body(&self) -> ClientResult<RequestBody>;

    /// Decode a 2xx response body to this request
    fn decode(&self, status: u16, body: &[u8]) -> ClientResult<Self::Response> {
        Self::Response::from_body(status, body)
    }

    /// Compact description for debug logs
    fn log_summary(&self) -> serde_json::Value {
        serde_json::json!({ "endpoint": Self::ENDPOINT, "path": self.path().to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_path_segments() {
        let path = ApiPath::new("/files").param("file-1").route("content");
        assert_eq!(path.segments(), ["files", "file-1", "content"]);
        assert_eq!(path.to_string(), "/files/file-1/content");

        let path = ApiPath::new("/models").param("ft:gpt/3.5");
        assert_eq!(path.segments().len(), 2);
        assert_eq!(path.segments()[1], "ft:gpt/3.5");
    }
}
