//! Precondition Repair
//!
//! Inserts `create_directory` actions so that every repository exists before
//! a git action and every parent directory exists before a write. Pure data
//! transformation: no provider is contacted and the filesystem is not read.

use std::collections::HashSet;
use std::path::PathBuf;

use plan_relay_core::{paths, Action, ProviderId};
use plan_relay_tools::GitCall;

use crate::utils::error::{AppError, AppResult};

/// Rewrite `actions` with the missing directory-creation steps.
///
/// Insertion is deduplicated per canonical directory, for repositories and
/// write parents alike, and a `create_directory` already in the plan counts.
/// Running the pass on its own output returns it unchanged.
pub fn repair_plan(actions: &[Action]) -> AppResult<Vec<Action>> {
    let mut ensured: HashSet<PathBuf> = HashSet::new();
    let mut repaired = Vec::with_capacity(actions.len());

    for action in actions {
        match action.provider() {
            Some(ProviderId::Filesystem) if action.tool == "create_directory" => {
                if let Some(raw) = action.str_arg("path")? {
                    ensured.insert(paths::absolutize(raw));
                }
            }
            Some(ProviderId::Filesystem) if action.tool == "write_file" => {
                let raw = action.str_arg("path")?.ok_or_else(|| {
                    AppError::validation(format!(
                        "{}.write_file requires a 'path' argument",
                        action.server
                    ))
                })?;
                let parent = paths::parent_dir(&paths::absolutize(raw));
                if ensured.insert(parent.clone()) {
                    repaired.push(Action::create_directory(&parent));
                }
            }
            Some(ProviderId::Git) => {
                let repo = GitCall::repo_path_of(&action.tool, &action.args)
                    .map_err(|e| AppError::from_decode(ProviderId::Git, e))?;
                if ensured.insert(repo.clone()) {
                    repaired.push(Action::create_directory(&repo));
                }
            }
            _ => {}
        }
        repaired.push(action.clone());
    }

    Ok(repaired)
}
