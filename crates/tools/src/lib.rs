//! Plan Relay Tools
//!
//! Per-provider tool catalogs. Each provider gets an enum with one variant
//! per supported tool, decoded from an action's `(tool, args)` pair at the
//! dispatch boundary. Unknown tool names decode to
//! `DecodeError::Unsupported` instead of reaching the provider.
//!
//! Decoding also resolves path-like arguments to absolute paths, so the
//! provider-native argument object produced by `arguments()` is ready to
//! send as-is.

pub mod args;
pub mod filesystem;
pub mod git;
pub mod lol;
pub mod movies;
pub mod spotify;

use serde_json::Value;

use plan_relay_core::Args;

pub use args::{ArgReader, DecodeError, DecodeResult};
pub use filesystem::FilesystemTool;
pub use git::{GitCall, GitTool};
pub use lol::LolTool;
pub use movies::MoviesTool;
pub use spotify::SpotifyTool;

/// A provider's tool catalog.
pub trait ProviderTool: Sized {
    /// Decode a planner action into a supported tool call.
    fn decode(tool: &str, args: &Args) -> DecodeResult<Self>;

    /// Tool name as the provider knows it
    fn name(&self) -> &'static str;

    /// Provider-native argument object
    fn arguments(&self) -> Value;
}
