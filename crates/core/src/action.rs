//! Plan Data Model
//!
//! The caller-facing shapes: `Action` (one requested tool invocation),
//! `ExecutionResult` (its normalized outcome), and `ProviderId` (the closed
//! set of provider kinds an action may address).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Tool arguments as supplied by the planner.
pub type Args = Map<String, Value>;

/// Closed set of provider kinds the engine knows how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// Directory-scoped filesystem server (MCP over stdio)
    Filesystem,
    /// Version-control server, one session per repository (MCP over stdio)
    Git,
    /// Music catalog / playlist server (MCP over stdio)
    Spotify,
    /// Game analytics server (line-delimited JSON-RPC over stdio)
    Lol,
    /// Remote movie catalog (JSON-RPC over HTTP)
    Movies,
}

impl ProviderId {
    pub const ALL: [ProviderId; 5] = [
        ProviderId::Filesystem,
        ProviderId::Git,
        ProviderId::Spotify,
        ProviderId::Lol,
        ProviderId::Movies,
    ];

    /// Resolve a planner-supplied server name, accepting the generic aliases.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "filesystem" | "fs" => Some(Self::Filesystem),
            "git" | "vcs" => Some(Self::Git),
            "spotify" | "music" => Some(Self::Spotify),
            "lol" | "game_analytics" => Some(Self::Lol),
            "movies" | "catalog" => Some(Self::Movies),
            _ => None,
        }
    }

    /// Canonical server name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filesystem => "filesystem",
            Self::Git => "git",
            Self::Spotify => "spotify",
            Self::Lol => "lol",
            Self::Movies => "movies",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requested tool invocation. Position in the plan is significant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Provider name as written by the planner (may be unknown)
    pub server: String,
    /// Tool name as written by the planner
    pub tool: String,
    /// Tool arguments; `null` or missing is treated as `{}`
    #[serde(default, deserialize_with = "null_as_empty_args")]
    pub args: Args,
}

fn null_as_empty_args<'de, D>(deserializer: D) -> Result<Args, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Args>::deserialize(deserializer)?.unwrap_or_default())
}

impl Action {
    /// Create an action
    pub fn new(server: impl Into<String>, tool: impl Into<String>, args: Args) -> Self {
        Self {
            server: server.into(),
            tool: tool.into(),
            args,
        }
    }

    /// The filesystem `create_directory` action used by precondition repair.
    pub fn create_directory(path: &Path) -> Self {
        let mut args = Args::new();
        args.insert(
            "path".to_string(),
            Value::String(path.to_string_lossy().into_owned()),
        );
        Self::new(ProviderId::Filesystem.as_str(), "create_directory", args)
    }

    /// The provider this action addresses, if the name is known
    pub fn provider(&self) -> Option<ProviderId> {
        ProviderId::parse(&self.server)
    }

    /// Read a string argument. `Ok(None)` when absent or null.
    pub fn str_arg(&self, key: &str) -> CoreResult<Option<&str>> {
        match self.args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(CoreError::validation(format!(
                "{}.{}: argument '{}' must be a string, got {}",
                self.server, self.tool, key, other
            ))),
        }
    }
}

/// Normalized outcome of one action (or of a synthesized recovery call).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub server: String,
    pub tool: String,
    pub args: Args,
    pub ok: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl ExecutionResult {
    /// Successful outcome for an action
    pub fn success(action: &Action, result: Option<Value>) -> Self {
        Self {
            server: action.server.clone(),
            tool: action.tool.clone(),
            args: action.args.clone(),
            ok: true,
            result,
            error: None,
        }
    }

    /// Failed outcome for an action
    pub fn failure(action: &Action, error: impl Into<String>) -> Self {
        Self {
            server: action.server.clone(),
            tool: action.tool.clone(),
            args: action.args.clone(),
            ok: false,
            result: None,
            error: Some(error.into()),
        }
    }

    /// Whether this result belongs to the given provider
    pub fn is_provider(&self, provider: ProviderId) -> bool {
        ProviderId::parse(&self.server) == Some(provider)
    }
}

/// Accepted plan documents: a bare action array, or planner output with an
/// `actions` field (other fields such as `thought` are ignored).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlanDocument {
    Actions(Vec<Action>),
    Envelope { actions: Vec<Action> },
}

impl PlanDocument {
    /// Parse a plan from JSON text
    pub fn parse(text: &str) -> CoreResult<Vec<Action>> {
        let doc: PlanDocument = serde_json::from_str(text).map_err(|e| {
            CoreError::parse(format!(
                "expected an array of actions or an object with 'actions': {}",
                e
            ))
        })?;
        Ok(doc.into_actions())
    }

    pub fn into_actions(self) -> Vec<Action> {
        match self {
            Self::Actions(actions) | Self::Envelope { actions } => actions,
        }
    }
}
