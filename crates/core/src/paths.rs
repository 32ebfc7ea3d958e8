//! Path Resolution
//!
//! Normalizes path-like tool arguments (`~`, `$VAR`, relative segments) into
//! absolute paths, and derives the set of directories the filesystem
//! provider is allowed to touch.
//!
//! Normalization is lexical: nothing here requires the path to exist, so the
//! same logical path always maps to the same key regardless of spelling
//! (trailing slashes, `./`, `..`, relative vs absolute).

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::action::Action;

/// Argument keys that carry filesystem paths.
pub const PATH_ARG_KEYS: &[&str] = &["path", "repo_path"];

/// Expand `~` and `$VAR` / `${VAR}`, then absolutize and normalize.
pub fn absolutize(raw: &str) -> PathBuf {
    let expanded = expand_home(&expand_vars(raw.trim()));
    let path = PathBuf::from(expanded);
    let joined = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };
    normalize_lexically(&joined)
}

/// Absolutize and render as a string, for provider-native arguments.
pub fn absolutize_str(raw: &str) -> String {
    absolutize(raw).to_string_lossy().into_owned()
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(part) => out.push(part),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Parent directory, or the path itself when it has none (filesystem root).
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

/// Closest ancestor (or self) that currently exists as a directory.
pub fn nearest_existing_dir(path: &Path) -> PathBuf {
    let mut current = normalize_lexically(path);
    while !current.is_dir() {
        match current.parent() {
            Some(parent) if parent != current && !parent.as_os_str().is_empty() => {
                current = parent.to_path_buf();
            }
            _ => break,
        }
    }
    current
}

/// Sandbox roots for the filesystem provider: for every path-like argument
/// in the plan, the nearest existing ancestor of its parent directory.
/// Sorted and deduplicated.
pub fn allowed_directories(actions: &[Action]) -> Vec<PathBuf> {
    let mut dirs = BTreeSet::new();
    for action in actions {
        for key in PATH_ARG_KEYS {
            if let Some(raw) = action.args.get(*key).and_then(|v| v.as_str()) {
                if raw.trim().is_empty() {
                    continue;
                }
                let target = absolutize(raw);
                dirs.insert(nearest_existing_dir(&parent_dir(&target)));
            }
        }
    }
    dirs.into_iter().collect()
}

fn expand_home(raw: &str) -> String {
    let rest = if raw == "~" {
        ""
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        rest
    } else {
        return raw.to_string();
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home.to_string_lossy().into_owned(),
        Some(home) => home.join(rest).to_string_lossy().into_owned(),
        None => raw.to_string(),
    }
}

/// Unknown variables are left untouched.
fn expand_vars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match (name.is_empty(), std::env::var(name)) {
            (false, Ok(value)) => out.push_str(&value),
            _ => out.push_str(&rest[idx..idx + 1 + consumed]),
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}
