//! Provider Transports
//!
//! The three wire contracts the relay speaks:
//! - `mcp_client` - MCP over a child process's stdio (filesystem, git, music)
//! - `line_client` - plain line-delimited JSON-RPC over stdio (game analytics)
//! - `http_client` - JSON-RPC over HTTP POST (movie catalog)

pub mod http_client;
pub mod jsonrpc;
pub mod line_client;
pub mod mcp_client;
pub mod stdio;

pub use http_client::HttpRpcClient;
pub use line_client::LineRpcClient;
pub use mcp_client::{McpServerInfo, McpStdioClient};
