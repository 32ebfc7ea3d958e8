//! Version-control provider tools
//!
//! Every git call is scoped to a repository; the repository path selects
//! which provider session handles it. The `git_` prefix on tool names is
//! optional (`commit` and `git_commit` are the same tool).

use serde_json::{json, Value};
use std::path::PathBuf;

use plan_relay_core::paths;
use plan_relay_core::Args;

use crate::args::{ArgReader, DecodeError, DecodeResult};
use crate::ProviderTool;

#[derive(Debug, Clone, PartialEq)]
pub enum GitTool {
    Init,
    Add { files: Vec<String> },
    Commit { message: String },
    Status,
}

/// A git tool bound to its repository.
#[derive(Debug, Clone, PartialEq)]
pub struct GitCall {
    pub repo_path: PathBuf,
    pub tool: GitTool,
}

impl GitCall {
    /// Repository path an action targets, absolutized; defaults to `.`.
    pub fn repo_path_of(tool: &str, args: &Args) -> DecodeResult<PathBuf> {
        let reader = ArgReader::new(tool, args);
        Ok(paths::absolutize(&reader.str_or("repo_path", ".")?))
    }
}

impl ProviderTool for GitCall {
    fn decode(tool: &str, args: &Args) -> DecodeResult<Self> {
        let reader = ArgReader::new(tool, args);
        let op = match tool.strip_prefix("git_").unwrap_or(tool) {
            "init" => GitTool::Init,
            "add" => GitTool::Add {
                files: reader
                    .required_string_list("files")?
                    .iter()
                    .map(|f| paths::absolutize_str(f))
                    .collect(),
            },
            "commit" => GitTool::Commit {
                message: reader.required_str("message")?,
            },
            "status" => GitTool::Status,
            _ => {
                return Err(DecodeError::Unsupported {
                    tool: tool.to_string(),
                })
            }
        };
        Ok(Self {
            repo_path: Self::repo_path_of(tool, args)?,
            tool: op,
        })
    }

    fn name(&self) -> &'static str {
        match self.tool {
            GitTool::Init => "git_init",
            GitTool::Add { .. } => "git_add",
            GitTool::Commit { .. } => "git_commit",
            GitTool::Status => "git_status",
        }
    }

    fn arguments(&self) -> Value {
        let repo_path = self.repo_path.to_string_lossy();
        match &self.tool {
            GitTool::Init | GitTool::Status => json!({"repo_path": repo_path}),
            GitTool::Add { files } => json!({"repo_path": repo_path, "files": files}),
            GitTool::Commit { message } => json!({"repo_path": repo_path, "message": message}),
        }
    }
}
