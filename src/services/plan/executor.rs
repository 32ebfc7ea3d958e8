//! Plan Executor
//!
//! Runs a plan strictly in order, one action at a time. Every failure is
//! caught at the action boundary and recorded as an `ok: false` result, so
//! the returned list always has at least one entry per action.

use serde_json::Value;
use tracing::debug;

use plan_relay_core::{paths, Action, Args, ExecutionResult, ProviderId};
use plan_relay_tools::{FilesystemTool, GitCall, LolTool, MoviesTool, ProviderTool, SpotifyTool};

use crate::models::settings::RelaySettings;
use crate::utils::error::{AppError, AppResult};

use super::normalizer::{normalize, NormalizedResponse};
use super::sessions::SessionManager;

/// Execute `actions` against freshly opened provider sessions.
///
/// Sessions are released before this returns, in reverse order of opening.
pub async fn execute_plan(actions: &[Action], settings: &RelaySettings) -> Vec<ExecutionResult> {
    let allowed = paths::allowed_directories(actions);
    debug!(actions = actions.len(), allowed = ?allowed, "executing plan");

    let mut executor = PlanExecutor::new(SessionManager::new(settings, allowed));
    let results = executor.run(actions).await;
    executor.sessions.shutdown().await;
    results
}

pub struct PlanExecutor<'a> {
    sessions: SessionManager<'a>,
}

impl<'a> PlanExecutor<'a> {
    pub fn new(sessions: SessionManager<'a>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&mut self) -> &mut SessionManager<'a> {
        &mut self.sessions
    }

    /// Run every action, appending one result per action plus any
    /// synthesized recovery results.
    pub async fn run(&mut self, actions: &[Action]) -> Vec<ExecutionResult> {
        let mut results = Vec::with_capacity(actions.len());
        for action in actions {
            self.execute_action(action, &mut results).await;
        }
        results
    }

    async fn execute_action(&mut self, action: &Action, results: &mut Vec<ExecutionResult>) {
        let provider = match action.provider() {
            Some(provider) => provider,
            None => {
                let err = AppError::UnknownProvider(action.server.clone());
                results.push(ExecutionResult::failure(action, err.to_string()));
                return;
            }
        };
        debug!(provider = %provider, tool = %action.tool, "dispatching action");

        let (result, authorization_failure) = match self.dispatch(provider, action).await {
            Ok(response) => {
                let auth = response.is_authorization_failure();
                (response.into_result(action), auth)
            }
            Err(e) => {
                debug!(provider = %provider, tool = %action.tool, "action failed: {}", e);
                (ExecutionResult::failure(action, e.to_string()), e.is_authorization())
            }
        };
        results.push(result);

        if provider == ProviderId::Spotify
            && authorization_failure
            && SpotifyTool::canonical_name(&action.tool) != "auth_begin"
        {
            results.push(self.begin_authorization().await);
        }
    }

    /// Synthesized `auth_begin` call following an authorization failure.
    async fn begin_authorization(&mut self) -> ExecutionResult {
        let action = Action::new(ProviderId::Spotify.as_str(), "auth_begin", Args::new());
        debug!("music provider needs authorization; starting auth flow");
        match self.dispatch(ProviderId::Spotify, &action).await {
            Ok(response) => response.into_result(&action),
            Err(e) => ExecutionResult::failure(&action, e.to_string()),
        }
    }

    async fn dispatch(
        &mut self,
        provider: ProviderId,
        action: &Action,
    ) -> AppResult<NormalizedResponse> {
        let raw = match provider {
            ProviderId::Filesystem => self.call_filesystem(action).await?,
            ProviderId::Git => self.call_git(action).await?,
            ProviderId::Spotify => {
                let tool = decode::<SpotifyTool>(provider, action)?;
                self.sessions
                    .spotify()
                    .await?
                    .call_tool(tool.name(), tool.arguments())
                    .await?
            }
            ProviderId::Lol => {
                let tool = decode::<LolTool>(provider, action)?;
                let (method, params) = tool.request();
                self.sessions.lol().await?.rpc(method, params).await?
            }
            ProviderId::Movies => {
                let tool = decode::<MoviesTool>(provider, action)?;
                self.sessions
                    .movies()
                    .await?
                    .tools_call(tool.name(), tool.arguments())
                    .await?
            }
        };
        Ok(normalize(raw))
    }

    async fn call_filesystem(&mut self, action: &Action) -> AppResult<Value> {
        let tool = decode::<FilesystemTool>(ProviderId::Filesystem, action)?;
        let session = self.sessions.filesystem().await?;
        if let Some(mkdir) = tool.parent_precondition() {
            let response = normalize(session.call_tool(mkdir.name(), mkdir.arguments()).await?);
            if response.is_error {
                debug!(
                    path = %mkdir.path().display(),
                    "parent creation reported: {}", response.text
                );
            }
        }
        session.call_tool(tool.name(), tool.arguments()).await
    }

    async fn call_git(&mut self, action: &Action) -> AppResult<Value> {
        let call = decode::<GitCall>(ProviderId::Git, action)?;
        if !call.repo_path.is_dir() {
            std::fs::create_dir_all(&call.repo_path)?;
        }
        self.sessions
            .git(&call.repo_path)
            .await?
            .call_tool(call.name(), call.arguments())
            .await
    }
}

fn decode<T: ProviderTool>(provider: ProviderId, action: &Action) -> AppResult<T> {
    T::decode(&action.tool, &action.args).map_err(|e| AppError::from_decode(provider, e))
}
