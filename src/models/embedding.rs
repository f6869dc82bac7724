//! Embedding models
//!
//! `POST /embeddings`

use serde::{Deserialize, Serialize};

use super::common::Usage;
use super::{json_response, ApiPath, ApiRequest, RequestBody};
use crate::codec::is_blank;
use crate::utils::error::ClientResult;

/// Embedding request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmbeddingRequest {
    pub model: String,
    /// Texts to embed, one vector per entry
    pub input: Vec<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub user: String,
}

impl EmbeddingRequest {
    pub fn builder() -> EmbeddingRequestBuilder {
        EmbeddingRequestBuilder::default()
    }
}

/// Builder for [`EmbeddingRequest`]
#[derive(Debug, Clone, Default)]
pub struct EmbeddingRequestBuilder {
    inner: EmbeddingRequest,
}

impl EmbeddingRequestBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.inner.model = model.into();
        self
    }

    /// Append one input text
    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.inner.input.push(input.into());
        self
    }

    /// Replace the input list
    pub fn inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.input = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.inner.user = user.into();
        self
    }

    pub fn build(self) -> EmbeddingRequest {
        self.inner
    }
}

/// Embedding response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingResponse {
    pub object: String,
    pub data: Vec<Embedding>,
    pub model: String,
    pub usage: Usage,
}

/// One embedding vector
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Embedding {
    pub object: String,
    pub embedding: Vec<f64>,
    /// Position of the matching input
    pub index: u32,
}

json_response!(EmbeddingResponse);

impl ApiRequest for EmbeddingRequest {
    type Response = EmbeddingResponse;

    const ENDPOINT: &'static str = "embeddings";

    fn path(&self) -> ApiPath {
        ApiPath::new("/embeddings")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        RequestBody::json(self)
    }
}
