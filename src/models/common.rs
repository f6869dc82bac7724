//! Value types shared by several endpoint families

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::chat::ChatChoice;
use super::completion::CompletionChoice;
use super::edit::EditChoice;

/// Token accounting attached to text generation responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    /// Prompt token count
    pub prompt_tokens: u32,
    /// Completion token count
    pub completion_tokens: u32,
    /// Total token count
    pub total_tokens: u32,
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    #[default]
    Assistant,
    Function,
    /// Any role this client does not know about
    #[serde(other)]
    Other,
}

impl Role {
    /// Wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Function => "function",
            Role::Other => "other",
        }
    }
}

/// Why a generated choice stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FinishReason {
    /// Natural stop or a stop sequence was hit
    Stop,
    /// `max_tokens` or the context length was reached
    Length,
    /// Content was omitted by the content filter
    ContentFilter,
    /// The model called a function
    FunctionCall,
    /// No finish reason on the wire
    #[default]
    Null,
    /// Any value this client does not know about
    Other,
}

impl FinishReason {
    /// Map a wire value, `None` standing for JSON `null` or a missing key
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            None | Some("null") => FinishReason::Null,
            Some("stop") => FinishReason::Stop,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some("function_call") => FinishReason::FunctionCall,
            Some(_) => FinishReason::Other,
        }
    }

    /// Wire value, `None` for [`FinishReason::Null`]
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            FinishReason::Stop => Some("stop"),
            FinishReason::Length => Some("length"),
            FinishReason::ContentFilter => Some("content_filter"),
            FinishReason::FunctionCall => Some("function_call"),
            FinishReason::Null => None,
            FinishReason::Other => Some("other"),
        }
    }
}

impl Serialize for FinishReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_str() {
            Some(value) => serializer.serialize_str(value),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FinishReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(FinishReason::from_wire(value.as_deref()))
    }
}

/// Fields every choice carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoiceMeta {
    /// Zero-based position in the returned list
    pub index: u32,
    /// Why generation stopped
    pub finish_reason: FinishReason,
}

/// A generated choice from any text generation endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum Choice {
    Chat(ChatChoice),
    Completion(CompletionChoice),
    Edit(EditChoice),
}

impl Choice {
    /// Shared index and finish reason
    pub fn meta(&self) -> ChoiceMeta {
        match self {
            Choice::Chat(choice) => choice.meta,
            Choice::Completion(choice) => choice.meta,
            Choice::Edit(choice) => choice.meta(),
        }
    }

    /// Zero-based position in the returned list
    pub fn index(&self) -> u32 {
        self.meta().index
    }

    /// Why generation stopped
    pub fn finish_reason(&self) -> FinishReason {
        self.meta().finish_reason
    }

    /// Generated text
    pub fn text(&self) -> &str {
        match self {
            Choice::Chat(choice) => &choice.message.content,
            Choice::Completion(choice) => &choice.text,
            Choice::Edit(choice) => &choice.text,
        }
    }
}

impl From<ChatChoice> for Choice {
    fn from(choice: ChatChoice) -> Self {
        Choice::Chat(choice)
    }
}

impl From<CompletionChoice> for Choice {
    fn from(choice: CompletionChoice) -> Self {
        Choice::Completion(choice)
    }
}

impl From<EditChoice> for Choice {
    fn from(choice: EditChoice) -> Self {
        Choice::Edit(choice)
    }
}

/// Convert a unix timestamp from the wire, `None` when unset or out of range
pub fn timestamp_to_datetime(seconds: i64) -> Option<DateTime<Utc>> {
    if seconds == 0 {
        return None;
    }
    Utc.timestamp_opt(seconds, 0).single()
}
