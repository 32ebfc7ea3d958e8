//! Stdio Process
//!
//! A spawned provider process speaking newline-delimited JSON-RPC on its
//! standard streams. One request is in flight at a time; ids increase from 1.

use serde::Serialize;
use serde_json::Value;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, trace};

use crate::models::settings::LaunchSpec;
use crate::utils::error::{AppError, AppResult};

use super::jsonrpc::{parse_response_line, JsonRpcRequest, JsonRpcResponse};

/// Bytes of stderr kept for error reports
const STDERR_TAIL_BYTES: usize = 4096;

pub struct StdioProcess {
    label: String,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    stderr_tail: Arc<Mutex<String>>,
    next_id: u64,
    timeout: Duration,
}

impl StdioProcess {
    /// Spawn the process described by `spec`.
    pub fn spawn(label: &str, spec: &LaunchSpec, timeout: Duration) -> AppResult<Self> {
        let mut cmd = Command::new(&spec.command);
        cmd.args(&spec.args)
            .envs(&spec.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }

        let mut child = cmd.spawn().map_err(|e| {
            AppError::transport(format!(
                "Failed to spawn {} (command: {}): {}",
                label,
                spec.display(),
                e
            ))
        })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            AppError::transport(format!("Failed to capture stdin for {}", label))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            AppError::transport(format!("Failed to capture stdout for {}", label))
        })?;

        let stderr_tail = Arc::new(Mutex::new(String::new()));
        if let Some(stderr) = child.stderr.take() {
            let tail = Arc::clone(&stderr_tail);
            let label = label.to_string();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    trace!(provider = %label, "stderr: {}", line);
                    if let Ok(mut buf) = tail.lock() {
                        buf.push_str(&line);
                        buf.push('\n');
                        if buf.len() > STDERR_TAIL_BYTES {
                            let mut cut = buf.len() - STDERR_TAIL_BYTES;
                            while !buf.is_char_boundary(cut) {
                                cut += 1;
                            }
                            buf.drain(..cut);
                        }
                    }
                }
            });
        }

        debug!(provider = %label, command = %spec.display(), "spawned provider process");

        Ok(Self {
            label: label.to_string(),
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout),
            stderr_tail,
            next_id: 1,
            timeout,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whatever the process has written to stderr recently
    pub fn stderr_tail(&self) -> String {
        self.stderr_tail
            .lock()
            .map(|buf| buf.trim().to_string())
            .unwrap_or_default()
    }

    /// Whether the process is still running
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Write one message followed by a newline.
    pub async fn send<T: Serialize>(&mut self, message: &T) -> AppResult<()> {
        let line = serde_json::to_string(message)?;
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| AppError::transport(format!("{} stdin is closed", self.label)))?;
        let write = async {
            stdin.write_all(line.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            stdin.flush().await
        };
        write.await.map_err(|e| {
            AppError::transport(format!("Failed to write to {}: {}", self.label, e))
        })
    }

    /// Read lines until the response for `id` arrives.
    pub async fn read_response(&mut self, id: u64) -> AppResult<JsonRpcResponse> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = tokio::time::timeout(self.timeout, self.stdout.read_line(&mut line))
                .await
                .map_err(|_| {
                    AppError::transport(format!(
                        "Timeout waiting for {} response after {}s",
                        self.label,
                        self.timeout.as_secs()
                    ))
                })?
                .map_err(|e| {
                    AppError::transport(format!("Failed to read from {}: {}", self.label, e))
                })?;

            if read == 0 {
                let stderr = self.stderr_tail();
                let detail = if stderr.is_empty() {
                    String::new()
                } else {
                    format!(". stderr:\n{}", stderr)
                };
                return Err(AppError::transport(format!(
                    "{} closed stdout{}",
                    self.label, detail
                )));
            }

            match parse_response_line(&line) {
                Some(response) if response.answers(id) => return Ok(response),
                Some(_) => trace!(provider = %self.label, "skipping response for another id"),
                None => trace!(provider = %self.label, "stdout: {}", line.trim_end()),
            }
        }
    }

    /// Send a request and wait for its response.
    pub async fn request(
        &mut self,
        method: &str,
        params: Option<Value>,
    ) -> AppResult<JsonRpcResponse> {
        let id = self.next_id;
        self.next_id += 1;
        self.send(&JsonRpcRequest::new(id, method, params)).await?;
        self.read_response(id).await
    }

    /// Close stdin, then kill and reap the process.
    pub async fn shutdown(&mut self) {
        if let Some(mut stdin) = self.stdin.take() {
            let _ = stdin.shutdown().await;
        }
        let _ = self.child.kill().await;
        debug!(provider = %self.label, "provider process stopped");
    }
}
