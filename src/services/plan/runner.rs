//! Blocking entry points for synchronous callers.
//!
//! Each call builds a private current-thread runtime, so concurrent callers
//! never share sessions or an event loop.

use plan_relay_core::{Action, ExecutionResult};

use crate::models::settings::RelaySettings;
use crate::utils::error::{AppError, AppResult};

use super::executor::execute_plan;
use super::recovery::{execute_plan_with_retry, RetryPolicy};
use super::repair::repair_plan;

/// How `run_plan_blocking` processes a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Insert missing directory-creation steps first
    pub repair: bool,
    /// Re-run once when the music leg failed
    pub retry: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            repair: true,
            retry: false,
        }
    }
}

fn runtime() -> AppResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::internal(format!("Failed to start runtime: {}", e)))
}

/// Execute a plan, blocking the calling thread until it completes.
pub fn execute_plan_blocking(
    actions: &[Action],
    settings: &RelaySettings,
) -> AppResult<Vec<ExecutionResult>> {
    Ok(runtime()?.block_on(execute_plan(actions, settings)))
}

/// Repair (optionally), execute, and retry (optionally) in one blocking call.
///
/// Only a malformed plan makes this fail; provider problems end up in the
/// result list.
pub fn run_plan_blocking(
    actions: &[Action],
    settings: &RelaySettings,
    options: RunOptions,
) -> AppResult<Vec<ExecutionResult>> {
    let plan = if options.repair {
        repair_plan(actions)?
    } else {
        actions.to_vec()
    };

    let rt = runtime()?;
    let results = if options.retry {
        rt.block_on(execute_plan_with_retry(
            &plan,
            settings,
            RetryPolicy::from_settings(settings),
        ))
    } else {
        rt.block_on(execute_plan(&plan, settings))
    };
    Ok(results)
}
