//! MCP Client
//!
//! Client for MCP servers reached over a child process's stdio: the
//! filesystem, version-control and music providers.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

use crate::models::settings::LaunchSpec;
use crate::utils::error::{AppError, AppResult};

use super::jsonrpc::{JsonRpcNotification, MCP_PROTOCOL_VERSION};
use super::stdio::StdioProcess;

/// Information about a connected MCP server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpServerInfo {
    /// Provider label
    pub name: String,
    /// Protocol version
    pub protocol_version: String,
    /// Server capabilities
    pub capabilities: Value,
    /// Server-provided metadata
    pub server_info: Value,
}

/// MCP session over a spawned process
pub struct McpStdioClient {
    process: StdioProcess,
    server_info: McpServerInfo,
}

impl McpStdioClient {
    /// Spawn the server and perform the initialization handshake:
    /// 1. Send `initialize` request
    /// 2. Receive server capabilities
    /// 3. Send `notifications/initialized` notification
    pub async fn connect(label: &str, spec: &LaunchSpec, timeout: Duration) -> AppResult<Self> {
        let mut process = StdioProcess::spawn(label, spec, timeout)?;

        let response = process
            .request(
                "initialize",
                Some(json!({
                    "protocolVersion": MCP_PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": "plan-relay",
                        "version": env!("CARGO_PKG_VERSION")
                    }
                })),
            )
            .await?;

        let result = response.into_outcome().map_err(|msg| {
            AppError::transport(format!("{} initialization failed: {}", label, msg))
        })?;

        process
            .send(&JsonRpcNotification::new("notifications/initialized", json!({})))
            .await?;

        let server_info = McpServerInfo {
            name: label.to_string(),
            protocol_version: result
                .get("protocolVersion")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string(),
            capabilities: result.get("capabilities").cloned().unwrap_or_else(|| json!({})),
            server_info: result.get("serverInfo").cloned().unwrap_or_else(|| json!({})),
        };
        info!(
            provider = %label,
            protocol = %server_info.protocol_version,
            "MCP session open"
        );

        Ok(Self {
            process,
            server_info,
        })
    }

    /// Call a tool and return the raw `tools/call` result envelope.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> AppResult<Value> {
        let response = self
            .process
            .request(
                "tools/call",
                Some(json!({"name": name, "arguments": arguments})),
            )
            .await?;
        response.into_outcome().map_err(AppError::tool_reported)
    }

    /// Get server info
    pub fn server_info(&self) -> &McpServerInfo {
        &self.server_info
    }

    pub async fn shutdown(&mut self) {
        self.process.shutdown().await;
        info!(provider = %self.server_info.name, "MCP session closed");
    }
}
