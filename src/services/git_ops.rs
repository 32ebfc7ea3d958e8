//! Git Operations
//!
//! Command-line bootstrap for repositories the version-control provider is
//! about to open. The provider refuses to start against a directory that is
//! not a repository, so `git init` runs synchronously first.

use std::path::Path;
use std::process::Command;

use tracing::info;

use crate::utils::error::{AppError, AppResult};

/// Result of a git command execution
#[derive(Debug)]
pub struct GitResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl GitResult {
    /// Check if the command was successful and return stdout or error
    pub fn into_result(self) -> AppResult<String> {
        if self.success {
            Ok(self.stdout)
        } else {
            Err(AppError::command(format!(
                "git exited with {}: {}",
                self.exit_code,
                self.stderr.trim()
            )))
        }
    }
}

/// Git CLI wrapper
#[derive(Debug, Default)]
pub struct GitOps;

impl GitOps {
    pub fn new() -> Self {
        Self
    }

    /// Execute a git command in the specified directory
    pub fn execute(&self, cwd: &Path, args: &[&str]) -> AppResult<GitResult> {
        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            // Never wait on a credential prompt
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .output()
            .map_err(|e| AppError::command(format!("Failed to execute git: {}", e)))?;

        Ok(GitResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Whether `path` is the root of a repository
    pub fn is_repository(&self, path: &Path) -> bool {
        path.join(".git").exists()
    }

    /// Create `path` if needed and make it a repository.
    ///
    /// A directory that already is a repository is left untouched.
    pub fn ensure_repository(&self, path: &Path) -> AppResult<()> {
        std::fs::create_dir_all(path)?;
        if self.is_repository(path) {
            return Ok(());
        }
        self.execute(path, &["init"])?.into_result()?;
        info!(repo = %path.display(), "initialized repository");
        Ok(())
    }
}
