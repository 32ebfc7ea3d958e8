//! Error Handling
//!
//! Unified error types for the plan relay.
//! Uses thiserror for ergonomic error definitions.
//!
//! Every variant except `Validation` raised by precondition repair is
//! caught at the action boundary and turned into an `ok: false` result.

use thiserror::Error;

use plan_relay_core::{CoreError, ProviderId};
use plan_relay_tools::DecodeError;

/// Case-insensitive markers of an authorization failure in provider text.
pub const AUTHORIZATION_MARKERS: &[&str] =
    &["oauth", "login", "unauthorized", "not authenticated"];

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The action names a provider the engine does not know
    #[error("Unsupported provider: {0}")]
    UnknownProvider(String),

    /// The provider session could not be opened (spawn, handshake, connect)
    #[error("{provider} provider unavailable: {reason}")]
    ProviderUnavailable { provider: ProviderId, reason: String },

    /// The provider has no tool by that name
    #[error("Tool '{tool}' is not supported by provider '{provider}'")]
    ToolNotSupported { provider: ProviderId, tool: String },

    /// The provider answered and reported a failure
    #[error("{0}")]
    ToolReported(String),

    /// Timeout, closed pipe, malformed response, HTTP failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed actions or arguments
    #[error("Validation error: {0}")]
    Validation(String),

    /// External command errors (git bootstrap)
    #[error("Command error: {0}")]
    Command(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Errors from the core crate
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a provider-unavailable error
    pub fn provider_unavailable(provider: ProviderId, reason: impl Into<String>) -> Self {
        Self::ProviderUnavailable {
            provider,
            reason: reason.into(),
        }
    }

    /// Create a tool-reported error
    pub fn tool_reported(msg: impl Into<String>) -> Self {
        Self::ToolReported(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a command error
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Map a tool decoding failure for the given provider.
    pub fn from_decode(provider: ProviderId, err: DecodeError) -> Self {
        match err {
            DecodeError::Unsupported { tool } => Self::ToolNotSupported { provider, tool },
            other => Self::Validation(other.to_string()),
        }
    }

    /// Whether this is a provider-reported failure that reads like an
    /// authorization problem.
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::ToolReported(msg) if mentions_authorization(msg))
    }
}

/// Whether provider text matches one of the authorization markers.
pub fn mentions_authorization(text: &str) -> bool {
    let lower = text.to_lowercase();
    AUTHORIZATION_MARKERS
        .iter()
        .any(|marker| lower.contains(marker))
}
