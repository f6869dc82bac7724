//! Logging utilities
//!
//! Subscriber initialisation and request summaries for debug logs

use crate::models::chat::{ChatRequest, Message};
use crate::models::Role;
use tracing_subscriber::EnvFilter;

/// Set to true to include full request details (functions, system prompts) in debug logs
/// Default is false to reduce log verbosity
pub const VERBOSE_REQUEST_LOGGING: bool = false;

/// Install the global tracing subscriber
///
/// `format` is `text` (human readable) or `json`. Calling this twice is a
/// no-op, the first subscriber stays installed.
pub fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let result = if format == "json" {
        // JSON format logs (production environment)
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .try_init()
    } else {
        // Human readable format (development environment)
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .try_init()
    };

    if result.is_ok() {
        tracing::debug!("Logging system initialized");
    }
}

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len).collect();
        format!("{}... ({} chars truncated)", kept, s.chars().count() - max_len)
    } else {
        s.to_string()
    }
}

/// Create a filtered version of a chat message for logging
fn filter_message(msg: &Message) -> serde_json::Value {
    // System prompts are truncated more aggressively
    let max_len = if msg.role == Role::System { 100 } else { 200 };

    let mut obj = serde_json::json!({
        "role": msg.role.as_str(),
        "content": truncate_content(&msg.content, max_len),
    });

    if let Some(call) = &msg.function_call {
        obj["function_call"] = serde_json::json!(call.name);
    }

    obj
}

/// Create a filtered summary of a chat request for logging
/// Keeps original structure but truncates verbose content
pub fn create_chat_log_summary(request: &ChatRequest) -> serde_json::Value {
    if VERBOSE_REQUEST_LOGGING {
        serde_json::to_value(request).unwrap_or(serde_json::json!({"error": "serialize failed"}))
    } else {
        let filtered_messages: Vec<serde_json::Value> =
            request.messages.iter().map(filter_message).collect();

        let functions = if request.functions.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::json!([format!("...{} functions (details truncated)", request.functions.len())])
        };

        serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "stream": request.stream,
            "messages": filtered_messages,
            "functions": functions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_content() {
        assert_eq!(truncate_content("short", 10), "short");
        assert_eq!(truncate_content("abcdef", 3), "abc... (3 chars truncated)");
        // multi-byte characters are never split
        assert_eq!(truncate_content("ééé", 1), "é... (2 chars truncated)");
    }

    #[test]
    fn test_chat_summary_truncates_messages() {
        let request = ChatRequest::builder()
            .model("gpt-3.5-turbo")
            .message(Message::system("x".repeat(500)))
            .message(Message::user("Hello!"))
            .build();

        let summary = create_chat_log_summary(&request);

        assert_eq!(summary["model"], "gpt-3.5-turbo");
        assert_eq!(summary["messages"][1]["content"], "Hello!");
        let system = summary["messages"][0]["content"].as_str().unwrap();
        assert!(system.ends_with("(400 chars truncated)"));
        assert!(summary["functions"].is_null());
    }
}
