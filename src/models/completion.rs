//! Text completion models
//!
//! `POST /completions`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{timestamp_to_datetime, ChoiceMeta, Usage};
use super::{json_response, ApiPath, ApiRequest, RequestBody};
use crate::codec::{is_blank, is_false, is_unset_f64, is_unset_u32};
use crate::utils::error::ClientResult;

/// Text completion request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model name
    pub model: String,
    /// Prompt text
    #[serde(skip_serializing_if = "is_blank")]
    pub prompt: String,
    /// Text that comes after the completion
    #[serde(skip_serializing_if = "is_blank")]
    pub suffix: String,
    #[serde(skip_serializing_if = "is_unset_u32")]
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "is_unset_f64")]
    pub temperature: f64,
    #[serde(skip_serializing_if = "is_unset_f64")]
    pub top_p: f64,
    #[serde(skip_serializing_if = "is_unset_u32")]
    pub n: u32,
    #[serde(skip_serializing_if = "is_false")]
    pub stream: bool,
    /// Number of most likely tokens to return log probabilities for
    #[serde(skip_serializing_if = "is_unset_u32")]
    pub logprobs: u32,
    /// Echo back the prompt
    #[serde(skip_serializing_if = "is_false")]
    pub echo: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    #[serde(skip_serializing_if = "is_unset_f64")]
    pub presence_penalty: f64,
    #[serde(skip_serializing_if = "is_unset_f64")]
    pub frequency_penalty: f64,
    /// Server-side candidates to pick the best `n` from
    #[serde(skip_serializing_if = "is_unset_u32")]
    pub best_of: u32,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub logit_bias: BTreeMap<String, i32>,
    #[serde(skip_serializing_if = "is_blank")]
    pub user: String,
}

impl CompletionRequest {
    pub fn builder() -> CompletionRequestBuilder {
        CompletionRequestBuilder::default()
    }
}

/// Builder for [`CompletionRequest`]
#[derive(Debug, Clone, Default)]
pub struct CompletionRequestBuilder {
    inner: CompletionRequest,
}

impl CompletionRequestBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.inner.model = model.into();
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.inner.prompt = prompt.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.inner.suffix = suffix.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.inner.max_tokens = max_tokens;
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

    pub fn n(mut self, n: u32) -> Self {
        self.inner.n = n;
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.inner.stream = stream;
        self
    }

    pub fn logprobs(mut self, logprobs: u32) -> Self {
        self.inner.logprobs = logprobs;
        self
    }

    pub fn echo(mut self, echo: bool) -> Self {
        self.inner.echo = echo;
        self
    }

    pub fn stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.stop = stop.into_iter().map(Into::into).collect();
        self
    }

    pub fn presence_penalty(mut self, penalty: f64) -> Self {
        self.inner.presence_penalty = penalty;
        self
    }

    pub fn frequency_penalty(mut self, penalty: f64) -> Self {
        self.inner.frequency_penalty = penalty;
        self
    }

    pub fn best_of(mut self, best_of: u32) -> Self {
        self.inner.best_of = best_of;
        self
    }

    pub fn logit_bias(mut self, token: impl Into<String>, bias: i32) -> Self {
        self.inner.logit_bias.insert(token.into(), bias);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.inner.user = user.into();
        self
    }

    pub fn build(self) -> CompletionRequest {
        self.inner
    }
}

/// Text completion response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<CompletionChoice>,
    pub usage: Usage,
}

impl CompletionResponse {
    /// Creation time
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp_to_datetime(self.created)
    }
}

/// Completion choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionChoice {
    #[serde(flatten)]
    pub meta: ChoiceMeta,
    /// Generated text
    #[serde(default)]
    pub text: String,
    /// Log probabilities, present when requested
    #[serde(default)]
    pub logprobs: Option<LogProbs>,
}

/// Per-token log probabilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogProbs {
    pub tokens: Vec<String>,
    /// `null` for the first echoed prompt token
    pub token_logprobs: Vec<Option<f64>>,
    pub top_logprobs: Vec<Option<BTreeMap<String, f64>>>,
    pub text_offset: Vec<u32>,
}

json_response!(CompletionResponse);

impl ApiRequest for CompletionRequest {
    type Response = CompletionResponse;

    const ENDPOINT: &'static str = "completions";

    fn path(&self) -> ApiPath {
        ApiPath::new("/completions")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        RequestBody::json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FinishReason;

    #[test]
    fn test_flags_are_omitted_until_set() {
        let request = CompletionRequest::builder().model("text-davinci-003").prompt("Say this is a test").build();
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("echo").is_none());
        assert!(json.get("stream").is_none());

        let request = CompletionRequest::builder().model("text-davinci-003").echo(true).logprobs(2).build();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["echo"], true);
        assert_eq!(json["logprobs"], 2);
        assert!(json.get("prompt").is_none());
    }

    #[test]
    fn test_choice_with_logprobs() {
        let choice: CompletionChoice = serde_json::from_str(
            r#"{"text":" test","index":0,"finish_reason":"length",
                "logprobs":{"tokens":[" test"],"token_logprobs":[null],"top_logprobs":[{" test":-0.5}],"text_offset":[7]}}"#,
        )
        .unwrap();

        assert_eq!(choice.meta.finish_reason, FinishReason::Length);
        let logprobs = choice.logprobs.unwrap();
        assert_eq!(logprobs.token_logprobs, vec![None]);
        assert_eq!(logprobs.top_logprobs[0].as_ref().unwrap()[" test"], -0.5);
        assert_eq!(logprobs.text_offset, vec![7]);
    }
}
