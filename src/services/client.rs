//! API client
//!
//! Turns typed requests into HTTP calls and HTTP answers into envelopes.
//! Every endpoint has a blocking method and an `_async` twin; both funnel
//! through [`OpenAiClient::execute`] / [`OpenAiClient::execute_async`].

use crate::config::Settings;
use crate::models::*;
use crate::services::envelope::ClientResponse;
use crate::services::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::utils::error::{
    helpers::config_error, parse_error_message, ClientError, ClientResult, ErrorContext,
    TransportError,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info_span, warn, Instrument, Span};
use uuid::Uuid;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent` header value
pub const DEFAULT_USER_AGENT: &str = concat!("openai-client/", env!("CARGO_PKG_VERSION"));

const ORGANIZATION_HEADER: &str = "openai-organization";

/// Client for the OpenAI HTTP API
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    organization: Option<String>,
    user_agent: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("organization", &self.organization)
            .field("transport", &self.transport)
            .finish()
    }
}

/// Builder for [`OpenAiClient`]
pub struct OpenAiClientBuilder {
    api_key: String,
    base_url: String,
    organization: Option<String>,
    timeout: Duration,
    user_agent: String,
    transport: Option<Arc<dyn Transport>>,
}

impl Default for OpenAiClientBuilder {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            organization: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            transport: None,
        }
    }
}

impl OpenAiClientBuilder {
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send `OpenAI-Organization` with every request
    pub fn organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Use a custom transport instead of reqwest
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validate and build the client
    pub fn build(self) -> ClientResult<OpenAiClient> {
        let api_key = self.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(config_error("API key cannot be empty"));
        }

        if !self.base_url.starts_with("http") {
            return Err(config_error(format!(
                "Invalid base URL '{}', should start with 'http'",
                self.base_url
            )));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.timeout, self.user_agent.as_str())?),
        };

        Ok(OpenAiClient {
            api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            organization: self.organization.filter(|org| !org.trim().is_empty()),
            user_agent: self.user_agent,
            transport,
        })
    }
}

impl OpenAiClient {
    pub fn builder() -> OpenAiClientBuilder {
        OpenAiClientBuilder::default()
    }

    /// Client for the public endpoint with default settings
    pub fn new(api_key: impl Into<String>) -> ClientResult<Self> {
        Self::builder().api_key(api_key).build()
    }

    /// Client configured from loaded settings
    pub fn from_settings(settings: &Settings) -> ClientResult<Self> {
        let mut builder = Self::builder()
            .api_key(settings.api.api_key.as_str())
            .base_url(settings.api.base_url.as_str())
            .timeout(Duration::from_secs(settings.api.timeout));
        if let Some(organization) = &settings.api.organization {
            builder = builder.organization(organization.as_str());
        }
        builder.build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request on the calling thread
    pub fn execute<R: ApiRequest>(&self, request: R) -> ClientResponse<R, R::Response> {
        let span = call_span::<R>();
        let _guard = span.enter();

        let http_request = match self.prepare(&request) {
            Ok(http_request) => http_request,
            Err(e) => {
                error!("Failed to prepare request: {}", e);
                return ClientResponse::failure(request, e);
            }
        };

        let result = self.transport.send(http_request);
        complete(request, result)
    }

    /// Send a request asynchronously
    pub async fn execute_async<R: ApiRequest>(&self, request: R) -> ClientResponse<R, R::Response> {
        let span = call_span::<R>();

        async move {
            let http_request = match self.prepare(&request) {
                Ok(http_request) => http_request,
                Err(e) => {
                    error!("Failed to prepare request: {}", e);
                    return ClientResponse::failure(request, e);
                }
            };

            let result = self.transport.send_async(http_request).await;
            complete(request, result)
        }
        .instrument(span)
        .await
    }

    /// List all models
    pub fn list_models(&self) -> ClientResponse<ListModelsRequest, ModelListResponse> {
        self.execute(ListModelsRequest)
    }

    /// List all models
    pub async fn list_models_async(&self) -> ClientResponse<ListModelsRequest, ModelListResponse> {
        self.execute_async(ListModelsRequest).await
    }

    /// Encode the request and assemble URL and headers
    fn prepare<R: ApiRequest>(&self, request: &R) -> ClientResult<HttpRequest> {
        debug!(request = %request.log_summary(), "Dispatching request");

        let body = request.body()?;
        let url = self.endpoint_url(&request.path(), &request.query())?;
        let headers = self.headers(body.content_type())?;

        Ok(HttpRequest {
            method: request.method(),
            url,
            headers,
            body: body.into_bytes(),
        })
    }

    fn endpoint_url(&self, path: &ApiPath, query: &[(&'static str, String)]) -> ClientResult<Url> {
        if let Some(segment) = path
            .segments()
            .iter()
            .find(|segment| matches!(segment.trim(), "" | "." | ".."))
        {
            return Err(config_error(format!(
                "Invalid path segment '{}' in {}",
                segment, path
            )));
        }

        let mut url = Url::parse(&self.base_url).config_context("Invalid base URL")?;
        url.path_segments_mut()
            .map_err(|_| config_error(format!("Base URL '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(path.segments());

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        Ok(url)
    }

    fn headers(&self, content_type: Option<String>) -> ClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .config_context("Invalid API key")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent).config_context("Invalid user agent")?,
        );

        if let Some(content_type) = content_type {
            headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_str(&content_type).config_context("Invalid content type")?,
            );
        }

        if let Some(organization) = &self.organization {
            headers.insert(
                HeaderName::from_static(ORGANIZATION_HEADER),
                HeaderValue::from_str(organization).config_context("Invalid organization")?,
            );
        }

        Ok(headers)
    }
}

fn call_span<R: ApiRequest>() -> Span {
    info_span!(
        "api_call",
        request_id = %Uuid::new_v4(),
        endpoint = R::ENDPOINT
    )
}

/// Route a transport outcome into an envelope
fn complete<R: ApiRequest>(
    request: R,
    result: Result<HttpResponse, TransportError>,
) -> ClientResponse<R, R::Response> {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            error!("Transport failure: {}", e);
            return ClientResponse::failure(request, ClientError::Transport(e));
        }
    };

    let status = response.status;
    let code = status.as_u16();

    if status.is_success() {
        match request.decode(code, &response.body) {
            Ok(payload) => {
                debug!(status = code, bytes = response.body.len(), "Request completed");
                ClientResponse::success(
                    request,
                    code,
                    status.canonical_reason().map(str::to_string),
                    payload,
                )
            }
            Err(e) => {
                error!(status = code, "Failed to decode response: {}", e);
                ClientResponse::failure(request, e)
            }
        }
    } else {
        let message = parse_error_message(status, &response.body);
        warn!(status = code, "API returned error: {}", message);
        ClientResponse::success(
            request,
            code,
            Some(message),
            R::Response::from_error_body(&response.body),
        )
    }
}

/// Generates a blocking and an async method per endpoint
macro_rules! endpoints {
    ($($(#[$doc:meta])* $name:ident, $name_async:ident => $request:ty;)*) => {
        impl OpenAiClient {
            $(
                $(#[$doc])*
                pub fn $name(
                    &self,
                    request: $request,
                ) -> ClientResponse<$request, <$request as ApiRequest>::Response> {
                    self.execute(request)
                }

                $(#[$doc])*
                pub async fn $name_async(
                    &self,
                    request: $request,
                ) -> ClientResponse<$request, <$request as ApiRequest>::Response> {
                    self.execute_async(request).await
                }
            )*
        }
    };
}

endpoints! {
    /// Create a chat completion
    chat, chat_async => ChatRequest;
    /// Create a text completion
    completion, completion_async => CompletionRequest;
    /// Create an edit
    edit, edit_async => EditRequest;
    /// Create embeddings
    embedding, embedding_async => EmbeddingRequest;
    /// Classify text against the content policy
    moderation, moderation_async => CreateModerationRequest;
    /// Fetch one model
    retrieve_model, retrieve_model_async => RetrieveModelRequest;
    /// Generate images from a prompt
    create_image, create_image_async => ImageRequest;
    /// Edit an image
    edit_image, edit_image_async => ImageEditRequest;
    /// Create variations of an image
    create_image_variation, create_image_variation_async => ImageVariationRequest;
    /// Upload a file
    upload_file, upload_file_async => FileUploadRequest;
    /// List uploaded files
    list_files, list_files_async => ListFilesRequest;
    /// Fetch file metadata
    retrieve_file, retrieve_file_async => RetrieveFileRequest;
    /// Delete a file
    delete_file, delete_file_async => DeleteFileRequest;
    /// Download file content
    retrieve_file_content, retrieve_file_content_async => FileContentRequest;
    /// Transcribe audio
    create_transcription, create_transcription_async => AudioTranscriptionRequest;
    /// Translate audio into English
    create_translation, create_translation_async => AudioTranslationRequest;
}
