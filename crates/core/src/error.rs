//! Core Error Types
//!
//! Foundational error types shared across the Plan Relay workspace.
//! Kept to thiserror + std so the core crate stays lightweight.
//!
//! The root crate extends these with transport and provider failures
//! (spawn errors, HTTP errors, JSON-RPC errors) in its own `AppError`.

use thiserror::Error;

/// Core error type for the Plan Relay workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Caller-supplied data has the wrong shape
    #[error("Validation error: {0}")]
    Validation(String),

    /// A document could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
