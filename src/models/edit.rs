//! Edit models
//!
//! `POST /edits`

use serde::{Deserialize, Serialize};

use super::common::{timestamp_to_datetime, ChoiceMeta, FinishReason, Usage};
use super::{json_response, ApiPath, ApiRequest, RequestBody};
use crate::codec::{is_blank, is_unset_f64, is_unset_u32};
use crate::utils::error::ClientResult;

/// Edit request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditRequest {
    pub model: String,
    /// Text to edit
    #[serde(skip_serializing_if = "is_blank")]
    pub input: String,
    /// How the model should edit the input
    pub instruction: String,
    #[serde(skip_serializing_if = "is_unset_u32")]
    pub n: u32,
    #[serde(skip_serializing_if = "is_unset_f64")]
    pub temperature: f64,
    #[serde(skip_serializing_if = "is_unset_f64")]
    pub top_p: f64,
}

impl EditRequest {
    pub fn builder() -> EditRequestBuilder {
        EditRequestBuilder::default()
    }
}

/// Builder for [`EditRequest`]
#[derive(Debug, Clone, Default)]
pub struct EditRequestBuilder {
    inner: EditRequest,
}

impl EditRequestBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.inner.model = model.into();
        self
    }

    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.inner.input = input.into();
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.inner.instruction = instruction.into();
        self
    }

    pub fn n(mut self, n: u32) -> Self {
        self.inner.n = n;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.inner.temperature = temperature;
        self
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.inner.top_p = top_p;
        self
    }

    pub fn build(self) -> EditRequest {
        self.inner
    }
}

/// Edit response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditResponse {
    pub object: String,
    pub created: i64,
    pub choices: Vec<EditChoice>,
    pub usage: Usage,
}

impl EditResponse {
    /// Creation time
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp_to_datetime(self.created)
    }
}

/// Edit choice
///
/// Edits have no stop condition, so the finish reason is always
/// [`FinishReason::Null`] whatever the wire says.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditChoice {
    pub index: u32,
    pub text: String,
}

impl EditChoice {
    pub fn meta(&self) -> ChoiceMeta {
        ChoiceMeta {
            index: self.index,
            finish_reason: FinishReason::Null,
        }
    }
}

json_response!(EditResponse);

impl ApiRequest for EditRequest {
    type Response = EditResponse;

    const ENDPOINT: &'static str = "edits";

    fn path(&self) -> ApiPath {
        ApiPath::new("/edits")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        RequestBody::json(self)
    }
}
