//! Application Directories
//!
//! Resolves where the relay looks for its own configuration (~/.plan-relay/).
//! Path arguments inside plans are resolved by `plan_relay_core::paths`.

use std::path::PathBuf;

use crate::utils::error::{AppError, AppResult};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PLAN_RELAY_CONFIG";

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Plan Relay directory (~/.plan-relay/)
pub fn plan_relay_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".plan-relay"))
}

/// Get the default config file path (~/.plan-relay/config.json)
pub fn config_path() -> AppResult<PathBuf> {
    Ok(plan_relay_dir()?.join("config.json"))
}
