//! HTTP JSON-RPC client for the remote movie catalog.
//!
//! Stateless apart from a flag recording that the optional `initialize`
//! call has been attempted.

use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::utils::error::{AppError, AppResult};

use super::jsonrpc::{JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};

pub struct HttpRpcClient {
    endpoint: String,
    client: reqwest::Client,
    next_id: u64,
    initialized: bool,
}

impl HttpRpcClient {
    pub fn new(endpoint: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            client,
            next_id: 1,
            initialized: false,
        })
    }

    /// POST one request and return its `result`.
    pub async fn rpc(&mut self, method: &str, params: Value) -> AppResult<Value> {
        let id = self.next_id;
        self.next_id += 1;
        let request = JsonRpcRequest::new(id, method, Some(params));

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::transport(format!(
                "{} returned HTTP {}: {}",
                self.endpoint,
                status,
                body.trim()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::transport(format!("Failed to read response body: {}", e)))?;
        let envelope: JsonRpcResponse = serde_json::from_str(&text).map_err(|e| {
            AppError::transport(format!("Failed to parse JSON-RPC response: {}", e))
        })?;
        envelope.into_outcome().map_err(AppError::tool_reported)
    }

    /// Best-effort `initialize`, attempted at most once per client.
    pub async fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        let params = json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {"name": "plan-relay", "version": env!("CARGO_PKG_VERSION")}
        });
        match self.rpc("initialize", params).await {
            Ok(_) => debug!(endpoint = %self.endpoint, "catalog handshake done"),
            Err(e) => warn!(endpoint = %self.endpoint, "catalog handshake failed: {}", e),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// `tools/call` wrapper
    pub async fn tools_call(&mut self, name: &str, arguments: Value) -> AppResult<Value> {
        self.rpc("tools/call", json!({"name": name, "arguments": arguments}))
            .await
    }
}
