//! Settings Models
//!
//! Launch configuration for every provider the relay can reach. These are
//! external collaborator settings: the relay reads them, it never writes
//! them back.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, CONFIG_ENV_VAR};

/// Default python module serving the music catalog
pub const DEFAULT_SPOTIFY_ENTRY: &str = "mcp.spotify.server";

/// Default script serving game analytics
pub const DEFAULT_LOL_ENTRY: &str = "mcp/lol/server.py";

/// Default remote catalog endpoint
pub const DEFAULT_MOVIES_URL: &str = "http://0.0.0.0:8000/mcp/jsonrpc";

/// How to spawn a process-backed provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSpec {
    /// Executable to run
    pub command: String,
    /// Fixed arguments; per-session arguments are appended at open time
    pub args: Vec<String>,
    /// Variables added on top of the inherited environment
    pub env: HashMap<String, String>,
    /// Working directory (inherited when unset)
    pub cwd: Option<PathBuf>,
}

impl LaunchSpec {
    pub fn new(command: impl Into<String>, args: &[&str]) -> Self {
        Self {
            command: command.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            env: HashMap::new(),
            cwd: None,
        }
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Copy with extra trailing arguments
    pub fn extended<I, S>(&self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut spec = self.clone();
        spec.args.extend(extra.into_iter().map(Into::into));
        spec
    }

    /// `command arg1 arg2 ...`, for diagnostics
    pub fn display(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// HTTP JSON-RPC endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpEndpoint {
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for HttpEndpoint {
    fn default() -> Self {
        Self {
            url: DEFAULT_MOVIES_URL.to_string(),
            timeout_secs: 20,
        }
    }
}

/// Relay configuration stored in config.json.
///
/// Each provider block replaces its default wholesale when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Python interpreter used for python-based providers
    pub python: String,
    /// Appended to PYTHONPATH for the music provider
    pub project_root: Option<PathBuf>,
    /// Filesystem server; allowed directories are appended at open time
    pub filesystem: LaunchSpec,
    /// Git server; `--repository <path>` is appended per repository
    pub git: LaunchSpec,
    /// Music catalog server
    pub spotify: LaunchSpec,
    /// Game analytics server; runs from its script's directory unless `cwd` is set
    pub lol: LaunchSpec,
    /// Remote movie catalog
    pub movies: HttpEndpoint,
    /// Per-response read timeout for stdio providers, in seconds
    pub response_timeout_secs: u64,
    /// Delay before the plan-level retry, in milliseconds
    pub retry_delay_ms: u64,
}

fn default_python() -> String {
    if cfg!(windows) { "python" } else { "python3" }.to_string()
}

fn default_npx() -> String {
    if cfg!(windows) { "npx.cmd" } else { "npx" }.to_string()
}

/// Launch spec for the music provider: a `.py` entry runs as a script,
/// anything else as a module.
pub fn spotify_launch(python: &str, entry: &str) -> LaunchSpec {
    let entry = entry.trim();
    let spec = if entry.ends_with(".py") {
        LaunchSpec::new(
            python,
            &[&plan_relay_core::paths::absolutize_str(entry)],
        )
    } else {
        LaunchSpec::new(python, &["-m", entry])
    };
    spec.with_env("NO_COLOR", "1")
}

fn lol_launch(python: &str, entry: &str) -> LaunchSpec {
    LaunchSpec::new(python, &[&plan_relay_core::paths::absolutize_str(entry)])
        .with_env("NO_COLOR", "1")
        .with_env("PYTHONUNBUFFERED", "1")
}

impl Default for RelaySettings {
    fn default() -> Self {
        let python = default_python();
        Self {
            filesystem: LaunchSpec::new(
                default_npx(),
                &["-y", "@modelcontextprotocol/server-filesystem"],
            )
            .with_env("DEBUG", "mcp*,*")
            .with_env("MCP_LOG_LEVEL", "debug")
            .with_env("NO_COLOR", "1"),
            git: LaunchSpec::new(python.clone(), &["-m", "mcp_server_git"])
                .with_env("NO_COLOR", "1"),
            spotify: spotify_launch(&python, DEFAULT_SPOTIFY_ENTRY),
            lol: lol_launch(&python, DEFAULT_LOL_ENTRY),
            movies: HttpEndpoint::default(),
            project_root: None,
            response_timeout_secs: 60,
            retry_delay_ms: 1500,
            python,
        }
    }
}

/// Overrides read from the environment (partial update)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    pub python: Option<String>,
    pub spotify_entry: Option<String>,
    pub lol_entry: Option<String>,
    pub movies_url: Option<String>,
}

impl EnvOverrides {
    /// Collect overrides through a variable lookup; blank values are ignored.
    pub fn collect(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            python: get("PLAN_RELAY_PYTHON"),
            spotify_entry: get("MCP_SPOTIFY_ENTRY"),
            lol_entry: get("MCP_LOL_ENTRY"),
            movies_url: get("MCP_MOVIES_HTTP_URL"),
        }
    }

    /// Overrides from the process environment
    pub fn from_env() -> Self {
        Self::collect(|key| std::env::var(key).ok())
    }
}

impl RelaySettings {
    /// Apply environment overrides
    pub fn apply_overrides(&mut self, overrides: EnvOverrides) {
        if let Some(python) = overrides.python {
            self.git.command = python.clone();
            self.spotify.command = python.clone();
            self.lol.command = python.clone();
            self.python = python;
        }
        if let Some(entry) = overrides.spotify_entry {
            let env = std::mem::take(&mut self.spotify.env);
            self.spotify = spotify_launch(&self.python, &entry);
            self.spotify.env.extend(env);
        }
        if let Some(entry) = overrides.lol_entry {
            let mut spec = lol_launch(&self.python, &entry);
            spec.env.extend(std::mem::take(&mut self.lol.env));
            self.lol = spec;
        }
        if let Some(url) = overrides.movies_url {
            self.movies.url = url;
        }
    }

    /// Read settings from a JSON file
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Load settings: defaults, then a config file, then environment overrides.
    ///
    /// File lookup: `explicit`, else `$PLAN_RELAY_CONFIG`, else
    /// `~/.plan-relay/config.json` when it exists. An explicitly named file
    /// must exist.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let mut settings = match named {
            Some(path) => Self::from_file(&path)?,
            None => match config_path() {
                Ok(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        settings.apply_overrides(EnvOverrides::from_env());
        Ok(settings)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs.max(1))
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}
