//! JSON-RPC 2.0 envelopes shared by every transport.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version sent in the MCP `initialize` request
pub const MCP_PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC 2.0 request
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 notification (no id, no response)
#[derive(Debug, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: Value,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC 2.0 response
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcErrorBody>,
}

/// Error member of a response.
///
/// Some servers send a bare string instead of the `{code, message}` object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcErrorBody {
    Object {
        #[allow(dead_code)]
        #[serde(default)]
        code: Option<i64>,
        message: String,
        #[allow(dead_code)]
        #[serde(default)]
        data: Option<Value>,
    },
    Text(String),
    Other(Value),
}

impl JsonRpcErrorBody {
    pub fn message(&self) -> String {
        match self {
            Self::Object { message, .. } => message.clone(),
            Self::Text(text) => text.clone(),
            Self::Other(value) => value.to_string(),
        }
    }
}

impl JsonRpcResponse {
    /// Whether this response answers request `id`
    pub fn answers(&self, id: u64) -> bool {
        match &self.id {
            Some(Value::Number(n)) => n.as_u64() == Some(id),
            Some(Value::String(s)) => s.parse::<u64>().ok() == Some(id),
            _ => false,
        }
    }

    /// `result`, or the error message. A response with neither yields `Null`.
    pub fn into_outcome(self) -> Result<Value, String> {
        match self.error {
            Some(error) => Err(error.message()),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

/// Parse one stdout line as a response; log lines and notifications yield `None`.
pub fn parse_response_line(line: &str) -> Option<JsonRpcResponse> {
    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    let response: JsonRpcResponse = serde_json::from_str(trimmed).ok()?;
    if response.id.is_none() {
        return None;
    }
    Some(response)
}
