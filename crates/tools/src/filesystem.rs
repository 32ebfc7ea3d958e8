//! Filesystem provider tools

use serde_json::{json, Value};
use std::path::PathBuf;

use plan_relay_core::paths;
use plan_relay_core::Args;

use crate::args::{ArgReader, DecodeError, DecodeResult};
use crate::ProviderTool;

#[derive(Debug, Clone, PartialEq)]
pub enum FilesystemTool {
    CreateDirectory { path: PathBuf },
    WriteFile { path: PathBuf, content: String },
    ReadFile { path: PathBuf },
    ListDirectory { path: PathBuf },
}

impl FilesystemTool {
    /// Target path of the call
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::CreateDirectory { path }
            | Self::WriteFile { path, .. }
            | Self::ReadFile { path }
            | Self::ListDirectory { path } => path,
        }
    }

    /// For writes, the `create_directory` call for the parent directory.
    pub fn parent_precondition(&self) -> Option<FilesystemTool> {
        match self {
            Self::WriteFile { path, .. } => Some(Self::CreateDirectory {
                path: paths::parent_dir(path),
            }),
            _ => None,
        }
    }
}

impl ProviderTool for FilesystemTool {
    fn decode(tool: &str, args: &Args) -> DecodeResult<Self> {
        let reader = ArgReader::new(tool, args);
        let path = || -> DecodeResult<PathBuf> {
            Ok(paths::absolutize(&reader.required_str("path")?))
        };
        match tool {
            "create_directory" => Ok(Self::CreateDirectory { path: path()? }),
            "write_file" => Ok(Self::WriteFile {
                path: path()?,
                content: reader.required_str("content")?,
            }),
            "read_file" => Ok(Self::ReadFile { path: path()? }),
            "list_directory" => Ok(Self::ListDirectory { path: path()? }),
            other => Err(DecodeError::Unsupported {
                tool: other.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::CreateDirectory { .. } => "create_directory",
            Self::WriteFile { .. } => "write_file",
            Self::ReadFile { .. } => "read_file",
            Self::ListDirectory { .. } => "list_directory",
        }
    }

    fn arguments(&self) -> Value {
        let path = self.path().to_string_lossy();
        match self {
            Self::WriteFile { content, .. } => json!({"path": path, "content": content}),
            _ => json!({"path": path}),
        }
    }
}
