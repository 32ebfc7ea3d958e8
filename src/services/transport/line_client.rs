//! Line-framed JSON-RPC client for the game analytics provider.
//!
//! No MCP handshake: a plain `initialize` call on start, then one request
//! per action.

use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

use crate::models::settings::LaunchSpec;
use crate::utils::error::{AppError, AppResult};

use super::stdio::StdioProcess;

pub struct LineRpcClient {
    process: StdioProcess,
}

impl LineRpcClient {
    /// Spawn the process and send `initialize`.
    pub async fn start(label: &str, spec: &LaunchSpec, timeout: Duration) -> AppResult<Self> {
        let mut client = Self {
            process: StdioProcess::spawn(label, spec, timeout)?,
        };
        client.rpc("initialize", json!({})).await?;
        info!(provider = %label, "line RPC client started");
        Ok(client)
    }

    /// Issue one request and return its `result`.
    pub async fn rpc(&mut self, method: &str, params: Value) -> AppResult<Value> {
        if !self.process.is_alive() {
            let stderr = self.process.stderr_tail();
            return Err(AppError::transport(format!(
                "{} process is not running. stderr:\n{}",
                self.process.label(),
                stderr
            )));
        }
        let response = self.process.request(method, Some(params)).await?;
        response.into_outcome().map_err(AppError::tool_reported)
    }

    /// `tools/call` wrapper
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> AppResult<Value> {
        self.rpc("tools/call", json!({"name": name, "arguments": arguments}))
            .await
    }

    pub async fn shutdown(&mut self) {
        self.process.shutdown().await;
    }
}
