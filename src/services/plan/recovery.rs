//! Plan-level retry for the music provider.
//!
//! When any music action failed, the whole plan runs once more after a short
//! delay. The second run's results are used only if at least one music
//! action succeeded in it.

use std::time::Duration;

use tracing::info;

use plan_relay_core::{Action, ExecutionResult, ProviderId};

use crate::models::settings::RelaySettings;

use super::executor::execute_plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(1500),
        }
    }
}

impl RetryPolicy {
    pub fn from_settings(settings: &RelaySettings) -> Self {
        Self {
            delay: settings.retry_delay(),
        }
    }

    /// Whether a result list warrants the one retry
    pub fn should_retry(results: &[ExecutionResult]) -> bool {
        results
            .iter()
            .any(|r| r.is_provider(ProviderId::Spotify) && !r.ok)
    }

    /// Whether the retry's results replace the first attempt's
    pub fn improved(results: &[ExecutionResult]) -> bool {
        results
            .iter()
            .any(|r| r.is_provider(ProviderId::Spotify) && r.ok)
    }
}

/// `execute_plan`, re-run at most once when the music leg failed.
pub async fn execute_plan_with_retry(
    actions: &[Action],
    settings: &RelaySettings,
    policy: RetryPolicy,
) -> Vec<ExecutionResult> {
    let first = execute_plan(actions, settings).await;
    if !RetryPolicy::should_retry(&first) {
        return first;
    }

    info!(delay_ms = policy.delay.as_millis() as u64, "music actions failed; retrying plan once");
    tokio::time::sleep(policy.delay).await;
    let second = execute_plan(actions, settings).await;

    if RetryPolicy::improved(&second) {
        second
    } else {
        first
    }
}
