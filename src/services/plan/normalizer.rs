//! Result Normalizer
//!
//! Turns whatever a provider answered into the `{ok, result, error}`
//! envelope. Two shapes arrive here:
//! - MCP tool results: `{content: [{type, text}], isError}`
//! - plain JSON-RPC results from the analytics and catalog services, which
//!   signal lookup failures with a top-level `error` key

use serde_json::{Map, Value};

use plan_relay_core::{Action, ExecutionResult};

use crate::utils::error::mentions_authorization;

/// Error text used when a failing response carries no text
pub const DEFAULT_ERROR_TEXT: &str = "Tool returned error";

/// A provider response, classified
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    pub is_error: bool,
    /// Joined text fragments (MCP) or the error message (plain)
    pub text: String,
    pub payload: Option<Value>,
}

impl NormalizedResponse {
    /// Whether the response is a failure that reads like an authorization problem
    pub fn is_authorization_failure(&self) -> bool {
        self.is_error && mentions_authorization(&self.text)
    }

    pub fn into_result(self, action: &Action) -> ExecutionResult {
        if self.is_error {
            let error = if self.text.trim().is_empty() {
                DEFAULT_ERROR_TEXT.to_string()
            } else {
                self.text
            };
            ExecutionResult::failure(action, error)
        } else {
            ExecutionResult::success(action, self.payload)
        }
    }
}

fn is_mcp_envelope(object: &Map<String, Value>) -> bool {
    object.get("content").map_or(false, Value::is_array) || object.contains_key("isError")
}

/// Join every `text` fragment of an MCP `content` list with newlines.
pub fn joined_text(object: &Map<String, Value>) -> String {
    object
        .get("content")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// Structured decode of a text payload; only objects and arrays count.
fn parse_structured(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text.trim()) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

fn error_message(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Object(o) => o
            .get("message")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

/// Classify a raw provider response.
pub fn normalize(raw: Value) -> NormalizedResponse {
    match raw {
        Value::Null => NormalizedResponse {
            is_error: false,
            text: String::new(),
            payload: None,
        },
        Value::Object(mut object) if is_mcp_envelope(&object) => {
            let is_error = object
                .get("isError")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            let text = joined_text(&object);
            object.insert("text".to_string(), Value::String(text.clone()));
            if !is_error {
                if let Some(parsed) = parse_structured(&text) {
                    object.insert("parsed".to_string(), parsed);
                }
            }
            NormalizedResponse {
                is_error,
                text,
                payload: Some(Value::Object(object)),
            }
        }
        Value::Object(object) => {
            let error = object
                .get("error")
                .filter(|e| !e.is_null())
                .map(error_message);
            NormalizedResponse {
                is_error: error.is_some(),
                text: error.unwrap_or_default(),
                payload: Some(Value::Object(object)),
            }
        }
        other => NormalizedResponse {
            is_error: false,
            text: String::new(),
            payload: Some(other),
        },
    }
}
