//! Provider Session Manager
//!
//! Owns every provider connection opened during one plan execution. Sessions
//! open lazily on the first action that needs them and stay cached until
//! `shutdown`, which closes them in reverse order of acquisition. An open
//! failure is cached too: later actions for the same provider (or the same
//! repository) fail fast with the original reason instead of retrying.
//!
//! Child processes are spawned with `kill_on_drop`, so dropping the manager
//! without `shutdown` still releases them.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use plan_relay_core::ProviderId;

use crate::models::settings::{LaunchSpec, RelaySettings};
use crate::services::git_ops::GitOps;
use crate::services::transport::{HttpRpcClient, LineRpcClient, McpStdioClient};
use crate::utils::error::{AppError, AppResult};

/// A session slot: open, or failed with the reason it could not open.
enum Slot<T> {
    Open(T),
    Failed(String),
}

impl<T> Slot<T> {
    fn client(&mut self, provider: ProviderId) -> AppResult<&mut T> {
        match self {
            Self::Open(client) => Ok(client),
            Self::Failed(reason) => Err(AppError::provider_unavailable(provider, reason.clone())),
        }
    }
}

/// Acquisition record used to order teardown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionKey {
    Filesystem,
    Git(PathBuf),
    Spotify,
    Lol,
    Movies,
}

pub struct SessionManager<'a> {
    settings: &'a RelaySettings,
    allowed_dirs: Vec<PathBuf>,
    filesystem: Option<Slot<McpStdioClient>>,
    git: HashMap<PathBuf, Slot<McpStdioClient>>,
    spotify: Option<Slot<McpStdioClient>>,
    lol: Option<Slot<LineRpcClient>>,
    movies: Option<Slot<HttpRpcClient>>,
    opened: Vec<SessionKey>,
}

impl<'a> SessionManager<'a> {
    /// `allowed_dirs` is the filesystem sandbox for this execution.
    pub fn new(settings: &'a RelaySettings, allowed_dirs: Vec<PathBuf>) -> Self {
        Self {
            settings,
            allowed_dirs,
            filesystem: None,
            git: HashMap::new(),
            spotify: None,
            lol: None,
            movies: None,
            opened: Vec::new(),
        }
    }

    pub fn allowed_dirs(&self) -> &[PathBuf] {
        &self.allowed_dirs
    }

    /// Sessions successfully opened so far, in acquisition order
    pub fn opened(&self) -> &[SessionKey] {
        &self.opened
    }

    fn record<T>(
        &mut self,
        key: SessionKey,
        provider: ProviderId,
        opened: AppResult<T>,
    ) -> Slot<T> {
        match opened {
            Ok(client) => {
                self.opened.push(key);
                Slot::Open(client)
            }
            Err(e) => {
                warn!(provider = %provider, "failed to open session: {}", e);
                let reason = match e {
                    AppError::ProviderUnavailable { reason, .. } => reason,
                    other => other.to_string(),
                };
                Slot::Failed(reason)
            }
        }
    }

    /// Filesystem session, scoped to the allowed directories.
    pub async fn filesystem(&mut self) -> AppResult<&mut McpStdioClient> {
        if self.filesystem.is_none() {
            let opened = self.open_filesystem().await;
            let slot = self.record(SessionKey::Filesystem, ProviderId::Filesystem, opened);
            self.filesystem = Some(slot);
        }
        match self.filesystem.as_mut() {
            Some(slot) => slot.client(ProviderId::Filesystem),
            None => Err(AppError::internal("filesystem slot missing")),
        }
    }

    async fn open_filesystem(&self) -> AppResult<McpStdioClient> {
        if self.allowed_dirs.is_empty() {
            return Err(AppError::validation("no allowed directories for this plan"));
        }
        let spec = self
            .settings
            .filesystem
            .extended(self.allowed_dirs.iter().map(|d| d.to_string_lossy().into_owned()));
        McpStdioClient::connect("filesystem", &spec, self.settings.response_timeout()).await
    }

    /// Git session for one repository (absolute, normalized path).
    pub async fn git(&mut self, repo: &Path) -> AppResult<&mut McpStdioClient> {
        if !self.git.contains_key(repo) {
            let opened = self.open_git(repo).await;
            let slot = self.record(SessionKey::Git(repo.to_path_buf()), ProviderId::Git, opened);
            self.git.insert(repo.to_path_buf(), slot);
        }
        match self.git.get_mut(repo) {
            Some(slot) => slot.client(ProviderId::Git),
            None => Err(AppError::internal("git slot missing")),
        }
    }

    async fn open_git(&self, repo: &Path) -> AppResult<McpStdioClient> {
        GitOps::new().ensure_repository(repo)?;
        let spec = self.settings.git.extended([
            "--repository".to_string(),
            repo.to_string_lossy().into_owned(),
        ]);
        McpStdioClient::connect("git", &spec, self.settings.response_timeout()).await
    }

    /// Music catalog session
    pub async fn spotify(&mut self) -> AppResult<&mut McpStdioClient> {
        if self.spotify.is_none() {
            let opened = self.open_spotify().await;
            let slot = self.record(SessionKey::Spotify, ProviderId::Spotify, opened);
            self.spotify = Some(slot);
        }
        match self.spotify.as_mut() {
            Some(slot) => slot.client(ProviderId::Spotify),
            None => Err(AppError::internal("spotify slot missing")),
        }
    }

    async fn open_spotify(&self) -> AppResult<McpStdioClient> {
        let mut spec = self.settings.spotify.clone();
        if let Some(root) = &self.settings.project_root {
            spec.env.insert(
                "PYTHONPATH".to_string(),
                python_path_with(std::env::var("PYTHONPATH").ok(), root),
            );
        }
        McpStdioClient::connect("spotify", &spec, self.settings.response_timeout())
            .await
            .map_err(|e| {
                AppError::provider_unavailable(
                    ProviderId::Spotify,
                    format!(
                        "could not start music server (command: {}; args: {:?}): {}",
                        spec.command, spec.args, e
                    ),
                )
            })
    }

    /// Game analytics client
    pub async fn lol(&mut self) -> AppResult<&mut LineRpcClient> {
        if self.lol.is_none() {
            let opened = self.open_lol().await;
            let slot = self.record(SessionKey::Lol, ProviderId::Lol, opened);
            self.lol = Some(slot);
        }
        match self.lol.as_mut() {
            Some(slot) => slot.client(ProviderId::Lol),
            None => Err(AppError::internal("lol slot missing")),
        }
    }

    async fn open_lol(&self) -> AppResult<LineRpcClient> {
        let mut spec = self.settings.lol.clone();
        if spec.cwd.is_none() {
            spec.cwd = script_dir(&spec);
        }
        LineRpcClient::start("lol", &spec, self.settings.response_timeout()).await
    }

    /// Movie catalog client; the handshake is attempted once, on first use.
    pub async fn movies(&mut self) -> AppResult<&mut HttpRpcClient> {
        if self.movies.is_none() {
            let endpoint = &self.settings.movies;
            let opened = HttpRpcClient::new(
                &endpoint.url,
                std::time::Duration::from_secs(endpoint.timeout_secs.max(1)),
            );
            let slot = self.record(SessionKey::Movies, ProviderId::Movies, opened);
            self.movies = Some(slot);
        }
        let client = match self.movies.as_mut() {
            Some(slot) => slot.client(ProviderId::Movies)?,
            None => return Err(AppError::internal("movies slot missing")),
        };
        client.initialize().await;
        Ok(client)
    }

    /// Close every open session, most recently opened first. Returns the
    /// keys in the order they were released.
    pub async fn shutdown(&mut self) -> Vec<SessionKey> {
        let mut released = Vec::with_capacity(self.opened.len());
        while let Some(key) = self.opened.pop() {
            match &key {
                SessionKey::Filesystem => {
                    if let Some(Slot::Open(client)) = self.filesystem.as_mut() {
                        client.shutdown().await;
                    }
                    self.filesystem = None;
                }
                SessionKey::Git(repo) => {
                    if let Some(Slot::Open(mut client)) = self.git.remove(repo) {
                        client.shutdown().await;
                    }
                }
                SessionKey::Spotify => {
                    if let Some(Slot::Open(client)) = self.spotify.as_mut() {
                        client.shutdown().await;
                    }
                    self.spotify = None;
                }
                SessionKey::Lol => {
                    if let Some(Slot::Open(client)) = self.lol.as_mut() {
                        client.shutdown().await;
                    }
                    self.lol = None;
                }
                SessionKey::Movies => {
                    self.movies = None;
                }
            }
            info!(session = ?key, "session released");
            released.push(key);
        }
        released
    }
}

/// First `.py` argument's directory; the analytics server loads data files
/// relative to itself.
fn script_dir(spec: &LaunchSpec) -> Option<PathBuf> {
    spec.args
        .iter()
        .find(|arg| arg.ends_with(".py"))
        .and_then(|script| Path::new(script).parent())
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Existing PYTHONPATH with `root` appended.
fn python_path_with(existing: Option<String>, root: &Path) -> String {
    let separator = if cfg!(windows) { ";" } else { ":" };
    let root = root.to_string_lossy();
    match existing.filter(|p| !p.is_empty()) {
        Some(existing) => format!("{}{}{}", existing, separator, root),
        None => root.into_owned(),
    }
}
