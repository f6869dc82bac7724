//! Moderation models
//!
//! `POST /moderations`

use serde::{Deserialize, Serialize};

use super::{json_response, ApiPath, ApiRequest, RequestBody};
use crate::codec::is_blank;
use crate::utils::error::ClientResult;

/// Moderation request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateModerationRequest {
    /// Texts to classify
    pub input: Vec<String>,
    /// `text-moderation-stable` or `text-moderation-latest` (optional)
    #[serde(skip_serializing_if = "is_blank")]
    pub model: String,
}

impl CreateModerationRequest {
    pub fn builder() -> CreateModerationRequestBuilder {
        CreateModerationRequestBuilder::default()
    }
}

/// Builder for [`CreateModerationRequest`]
#[derive(Debug, Clone, Default)]
pub struct CreateModerationRequestBuilder {
    inner: CreateModerationRequest,
}

impl CreateModerationRequestBuilder {
    /// Append one input text
    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.inner.input.push(input.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.inner.model = model.into();
        self
    }

    pub fn build(self) -> CreateModerationRequest {
        self.inner
    }
}

/// Moderation response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateModerationResponse {
    pub id: String,
    pub model: String,
    /// One result per input, in input order
    pub results: Vec<ModerationResult>,
}

/// Classification of one input
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationResult {
    /// Whether any category was flagged
    pub flagged: bool,
    pub categories: ModerationCategories,
    pub category_scores: ModerationCategoryScores,
}

/// Per-category verdicts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationCategories {
    pub hate: bool,
    #[serde(rename = "hate/threatening")]
    pub hate_threatening: bool,
    pub harassment: bool,
    #[serde(rename = "harassment/threatening")]
    pub harassment_threatening: bool,
    #[serde(rename = "self-harm")]
    pub self_harm: bool,
    #[serde(rename = "self-harm/intent")]
    pub self_harm_intent: bool,
    #[serde(rename = "self-harm/instructions")]
    pub self_harm_instructions: bool,
    pub sexual: bool,
    #[serde(rename = "sexual/minors")]
    pub sexual_minors: bool,
    pub violence: bool,
    #[serde(rename = "violence/graphic")]
    pub violence_graphic: bool,
}

/// Per-category confidence scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationCategoryScores {
    pub hate: f64,
    #[serde(rename = "hate/threatening")]
    pub hate_threatening: f64,
    pub harassment: f64,
    #[serde(rename = "harassment/threatening")]
    pub harassment_threatening: f64,
    #[serde(rename = "self-harm")]
    pub self_harm: f64,
    #[serde(rename = "self-harm/intent")]
    pub self_harm_intent: f64,
    #[serde(rename = "self-harm/instructions")]
    pub self_harm_instructions: f64,
    pub sexual: f64,
    #[serde(rename = "sexual/minors")]
    pub sexual_minors: f64,
    pub violence: f64,
    #[serde(rename = "violence/graphic")]
    pub violence_graphic: f64,
}

json_response!(CreateModerationResponse);

impl ApiRequest for CreateModerationRequest {
    type Response = CreateModerationResponse;

    const ENDPOINT: &'static str = "moderations";

    fn path(&self) -> ApiPath {
        ApiPath::new("/moderations")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        RequestBody::json(self)
    }
}
