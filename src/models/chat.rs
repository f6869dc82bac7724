//! Chat completion models
//!
//! `POST /chat/completions`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{timestamp_to_datetime, ChoiceMeta, Role, Usage};
use super::{json_response, ApiPath, ApiRequest, RequestBody};
use crate::codec::{is_blank, is_false, is_unset_f64, is_unset_u32, null_as_default};
use crate::utils::error::ClientResult;
use crate::utils::logging::create_chat_log_summary;

/// Function invocation requested by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionCall {
    /// Function name
    pub name: String,
    /// Arguments as a JSON encoded string
    pub arguments: String,
}

/// Chat message
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role (system/user/assistant/function)
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    /// Message content, empty when the model only called a function
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Author name (optional)
    #[serde(default, skip_serializing_if = "is_blank")]
    pub name: String,
    /// Function call (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
}

impl Message {
    /// Create a message with the given role
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Result of a function call, fed back to the model
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Role::Function, content).with_name(name)
    }

    /// Set the author name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Attach a function call
    pub fn with_function_call(mut self, function_call: FunctionCall) -> Self {
        self.function_call = Some(function_call);
        self
    }
}

/// Function the model may call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Function name
    pub name: String,
    /// Function description (optional)
    #[serde(default, skip_serializing_if = "is_blank")]
    pub description: String,
    /// Parameter JSON schema (optional)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub parameters: serde_json::Value,
}

/// How the model should pick functions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionCallPolicy {
    /// `"auto"` or `"none"`
    Mode(String),
    /// Force a specific function
    Named { name: String },
}

impl FunctionCallPolicy {
    pub fn auto() -> Self {
        FunctionCallPolicy::Mode("auto".to_string())
    }

    pub fn none() -> Self {
        FunctionCallPolicy::Mode("none".to_string())
    }

    pub fn named(name: impl Into<String>) -> Self {
        FunctionCallPolicy::Named { name: name.into() }
    }
}

/// Chat completion request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatRequest {
    /// Model name
    pub model: String,
    /// Message list
    pub messages: Vec<Message>,
    /// Callable functions (optional)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionDefinition>,
    /// Function selection policy (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallPolicy>,
    /// Temperature parameter (0 = unset)
    #[serde(skip_serializing_if = "is_unset_f64")]
    pub temperature: f64,
    /// Top-p parameter (0 = unset)
    #[serde(skip_serializing_if = "is_unset_f64")]
    pub top_p: f64,
    /// Number of generations (0 = unset)
    #[serde(skip_serializing_if = "is_unset_u32")]
    pub n: u32,
    /// Whether to stream the response
    #[serde(skip_serializing_if = "is_false")]
    pub stream: bool,
    /// Stop sequences
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    /// Maximum tokens to generate (0 = unset)
    #[serde(skip_serializing_if = "is_unset_u32")]
    pub max_tokens: u32,
    /// Presence penalty (0 = unset)
    #[serde(skip_serializing_if = "is_unset_f64")]
    pub presence_penalty: f64,
    /// Frequency penalty (0 = unset)
    #[serde(skip_serializing_if = "is_unset_f64")]
    pub frequency_penalty: f64,
    /// Logit bias keyed by token id
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub logit_bias: BTreeMap<String, i32>,
    /// End-user identifier
    #[serde(skip_serializing_if = "is_blank")]
    pub user: String,
}

impl ChatRequest {
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

/// Builder for [`ChatRequest`]
#[derive(Debug, Clone, Default)]
pub struct ChatRequestBuilder {
    inner: ChatRequest,
}

impl ChatRequestBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.inner.model = model.into();
        self
    }

    /// Replace the message list
    pub fn messages(mut self, messages: Vec<Message>) -> Self {
        self.inner.messages = messages;
        self
    }

    /// Append one message
    pub fn message(mut self, message: Message) -> Self {
        self.inner.messages.push(message);
        self
    }

    /// Append one callable function
    pub fn function(mut self, function: FunctionDefinition) -> Self {
        self.inner.functions.push(function);
        self
    }

    pub fn function_call(mut self, policy: FunctionCallPolicy) -> Self {
        self.inner.function_call = Some(policy);
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

    pub fn stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.stop = stop.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.inner.max_tokens = max_tokens;
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

    /// Bias one token
    pub fn logit_bias(mut self, token: impl Into<String>, bias: i32) -> Self {
        self.inner.logit_bias.insert(token.into(), bias);
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.inner.user = user.into();
        self
    }

    pub fn build(self) -> ChatRequest {
        self.inner
    }
}

/// Chat completion response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatResponse {
    /// Response ID
    pub id: String,
    /// Object type
    pub object: String,
    /// Creation timestamp
    pub created: i64,
    /// Model used
    pub model: String,
    /// Choice list
    pub choices: Vec<ChatChoice>,
    /// Usage statistics
    pub usage: Usage,
}

impl ChatResponse {
    /// Creation time
    pub fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        timestamp_to_datetime(self.created)
    }

    /// Message of the first choice
    pub fn first_message(&self) -> Option<&Message> {
        self.choices.first().map(|choice| &choice.message)
    }
}

/// Chat choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(flatten)]
    pub meta: ChoiceMeta,
    /// Generated message
    #[serde(default)]
    pub message: Message,
}

json_response!(ChatResponse);

impl ApiRequest for ChatRequest {
    type Response = ChatResponse;

    const ENDPOINT: &'static str = "chat.completions";

    fn path(&self) -> ApiPath {
        ApiPath::new("/chat/completions")
    }

    fn body(&self) -> ClientResult<RequestBody> {
        RequestBody::json(self)
    }

    fn log_summary(&self) -> serde_json::Value {
        create_chat_log_summary(self)
    }
}
