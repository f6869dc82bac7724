//! HTTP transport
//!
//! The dispatch layer only needs "send one request, get back status, headers
//! and body, or a transport fault". [`Transport`] is that seam; the default
//! implementation wraps reqwest.

use crate::utils::error::{ClientResult, ErrorContext, TransportError};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// A fully prepared HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Raw HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Sends prepared requests over the network
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send on the calling thread
    ///
    /// Must not be called from inside an async runtime.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Send asynchronously
    async fn send_async(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport
pub struct ReqwestTransport {
    client: reqwest::Client,
    blocking: OnceCell<reqwest::blocking::Client>,
    timeout: Duration,
    user_agent: String,
}

impl ReqwestTransport {
    /// Create a transport with the given per-request timeout and user agent
    pub fn new(timeout: Duration, user_agent: impl Into<String>) -> ClientResult<Self> {
        let user_agent = user_agent.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.as_str())
            .build()
            .config_context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            blocking: OnceCell::new(),
            timeout,
            user_agent,
        })
    }

    // Built on first use; constructing it inside a runtime would panic
    fn blocking_client(&self) -> Result<&reqwest::blocking::Client, TransportError> {
        self.blocking.get_or_try_init(|| {
            debug!("Creating blocking HTTP client");
            reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .user_agent(self.user_agent.as_str())
                .build()
                .map_err(TransportError::from)
        })
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .blocking_client()?
            .request(request.method, request.url)
            .headers(request.headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn send_async(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
