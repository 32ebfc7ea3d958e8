//! Plan Execution Integration Tests
//!
//! Repaired plans executed end-to-end against mock stdio providers:
//! - write precondition and the filesystem sandbox
//! - repository bootstrap before the git session opens
//! - per-provider failure isolation
//! - authorization recovery on the music provider
//! - direct and `tools/call` methods on the game analytics provider

use serde_json::json;

use plan_relay::{execute_plan, execute_plan_with_retry, repair_plan, ExecutionResult, RetryPolicy};

use super::support::{
    action, broken_launch, git_available, mock_settings, python3_available, read_call_log,
    tool_calls,
};

fn assert_prefix_matches(results: &[ExecutionResult], plan: &[plan_relay::Action]) {
    assert!(results.len() >= plan.len());
    for (result, original) in results.iter().zip(plan) {
        assert_eq!(result.server, original.server);
        assert_eq!(result.tool, original.tool);
    }
}

// ============================================================================
// Filesystem
// ============================================================================

#[tokio::test]
async fn test_write_into_missing_directory() {
    if !python3_available() {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path().join("a");
    std::fs::create_dir(&root).unwrap();
    let target = root.join("b").join("c.txt");
    let settings = mock_settings(temp.path());

    let plan = vec![action(
        "fs",
        "write_file",
        json!({"path": target.to_string_lossy(), "content": "x"}),
    )];
    let repaired = repair_plan(&plan).unwrap();
    assert_eq!(repaired.len(), 2);
    assert_eq!(repaired[0].tool, "create_directory");
    assert_eq!(repaired[0].args["path"], json!(root.join("b").to_string_lossy()));

    let results = execute_plan(&repaired, &settings).await;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.ok), "{:?}", results);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "x");

    let log = read_call_log(temp.path());
    // Sandbox is the nearest existing ancestor of the targets
    let init = log
        .iter()
        .find(|e| e["provider"] == "filesystem" && e["method"] == "initialize")
        .unwrap();
    assert_eq!(init["argv"][0], json!(root.to_string_lossy()));
    assert_eq!(
        tool_calls(&log, "filesystem"),
        vec!["create_directory", "create_directory", "write_file"]
    );
}

#[tokio::test]
async fn test_read_result_exposes_text_payload() {
    if !python3_available() {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let file = temp.path().join("notes.json");
    std::fs::write(&file, r#"{"title": "Groceries", "items": 3}"#).unwrap();
    let settings = mock_settings(temp.path());

    let plan = vec![action("filesystem", "read_file", json!({"path": file.to_string_lossy()}))];
    let results = execute_plan(&plan, &settings).await;

    assert!(results[0].ok);
    let payload = results[0].result.as_ref().unwrap();
    assert_eq!(payload["parsed"]["items"], 3);
    assert!(payload["text"].as_str().unwrap().contains("Groceries"));
}

// ============================================================================
// Failure isolation
// ============================================================================

#[tokio::test]
async fn test_unavailable_provider_fails_only_its_actions() {
    if !python3_available() {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let mut settings = mock_settings(temp.path());
    settings.filesystem = broken_launch();

    let out = temp.path().join("out");
    let plan = vec![
        action("filesystem", "create_directory", json!({"path": out.to_string_lossy()})),
        action("spotify", "search_track", json!({"query": "lofi"})),
        action(
            "filesystem",
            "write_file",
            json!({"path": out.join("a.txt").to_string_lossy(), "content": "x"}),
        ),
    ];
    let results = execute_plan(&plan, &settings).await;
    assert_prefix_matches(&results, &plan);
    assert_eq!(results.len(), 3);

    for index in [0, 2] {
        assert!(!results[index].ok);
        assert!(results[index]
            .error
            .as_deref()
            .unwrap()
            .starts_with("filesystem provider unavailable"));
    }
    assert!(results[1].ok);
    assert_eq!(results[1].result.as_ref().unwrap()["parsed"]["id"], "trk_42");
}

#[tokio::test]
async fn test_unknown_provider_yields_results_without_sessions() {
    if !python3_available() {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let settings = mock_settings(temp.path());
    let plan = vec![
        action("foo", "anything", json!({})),
        action("foo", "else", json!({"path": "/tmp/x"})),
    ];
    let results = execute_plan(&repair_plan(&plan).unwrap(), &settings).await;

    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| !r.ok && r.error.as_deref() == Some("Unsupported provider: foo")));
    assert!(read_call_log(temp.path()).is_empty());
}

// ============================================================================
// Version control
// ============================================================================

#[tokio::test]
async fn test_commit_bootstraps_repository() {
    if !python3_available() || !git_available() {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let settings = mock_settings(temp.path());
    let repo = temp.path().join("r");

    let plan = vec![action(
        "vcs",
        "commit",
        json!({"repo_path": format!("{}/", repo.to_string_lossy()), "message": "m"}),
    )];
    let repaired = repair_plan(&plan).unwrap();
    assert_eq!(repaired.len(), 2);
    assert_eq!(repaired[0].args["path"], json!(repo.to_string_lossy()));

    let results = execute_plan(&repaired, &settings).await;
    assert!(results.iter().all(|r| r.ok), "{:?}", results);
    assert!(repo.join(".git").exists());

    let log = read_call_log(temp.path());
    let init = log
        .iter()
        .find(|e| e["provider"] == "git" && e["method"] == "initialize")
        .unwrap();
    assert_eq!(init["argv"][0], "--repository");
    assert_eq!(init["argv"][1], json!(repo.to_string_lossy()));
    assert_eq!(tool_calls(&log, "git"), vec!["git_commit"]);
}

#[tokio::test]
async fn test_one_git_session_per_repository() {
    if !python3_available() || !git_available() {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let settings = mock_settings(temp.path());
    let first = temp.path().join("one");
    let second = temp.path().join("two");

    let plan = vec![
        action("git", "git_status", json!({"repo_path": first.to_string_lossy()})),
        action("git", "git_status", json!({"repo_path": second.to_string_lossy()})),
        action("git", "status", json!({"repo_path": format!("{}/.", first.to_string_lossy())})),
    ];
    let results = execute_plan(&plan, &settings).await;
    assert!(results.iter().all(|r| r.ok), "{:?}", results);

    let sessions = read_call_log(temp.path())
        .iter()
        .filter(|e| e["provider"] == "git" && e["method"] == "initialize")
        .count();
    assert_eq!(sessions, 2);
}

// ============================================================================
// Music authorization recovery
// ============================================================================

#[tokio::test]
async fn test_authorization_failure_appends_auth_begin() {
    if !python3_available() {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let mut settings = mock_settings(temp.path());
    settings.spotify = settings.spotify.clone().with_env("MOCK_AUTH_REQUIRED", "1");

    let plan = vec![
        action("spotify", "whoami", json!({})),
        action("spotify", "search_track", json!({"query": "rain"})),
    ];
    let results = execute_plan(&plan, &settings).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].tool, "whoami");
    assert!(!results[0].ok);
    assert!(results[0].error.as_deref().unwrap().contains("OAuth"));

    assert_eq!(results[1].tool, "auth_begin");
    assert_eq!(results[1].server, "spotify");
    assert!(results[1].args.is_empty());
    assert!(results[1].ok);
    assert!(results[1].result.as_ref().unwrap()["parsed"]["auth_url"]
        .as_str()
        .unwrap()
        .starts_with("https://"));

    assert_eq!(results[2].tool, "search_track");
    assert!(results[2].ok);
}

#[tokio::test]
async fn test_failing_auth_begin_is_not_recovered_again() {
    if !python3_available() {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let mut settings = mock_settings(temp.path());
    settings.spotify = settings
        .spotify
        .clone()
        .with_env("MOCK_AUTH_REQUIRED", "1")
        .with_env("MOCK_AUTH_BEGIN_FAILS", "1");

    let plan = vec![action("spotify", "auth_begin", json!({}))];
    let results = execute_plan(&plan, &settings).await;
    assert_eq!(results.len(), 1);
    assert!(!results[0].ok);

    let plan = vec![action("spotify", "whoami", json!({}))];
    let results = execute_plan(&plan, &settings).await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[1].tool, "auth_begin");
    assert!(!results[1].ok);
}

#[tokio::test]
async fn test_retry_reruns_plan_with_fresh_sessions() {
    if !python3_available() {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let mut settings = mock_settings(temp.path());
    settings.spotify = settings.spotify.clone().with_env("MOCK_AUTH_REQUIRED", "1");

    let plan = vec![action("music", "whoami", json!({}))];
    let policy = RetryPolicy::from_settings(&settings);
    let results = execute_plan_with_retry(&plan, &settings, policy).await;
    assert_eq!(results.len(), 2);

    // Two full executions, each with its own session
    let sessions = read_call_log(temp.path())
        .iter()
        .filter(|e| e["provider"] == "spotify" && e["method"] == "initialize")
        .count();
    assert_eq!(sessions, 2);
}

// ============================================================================
// Game analytics
// ============================================================================

#[tokio::test]
async fn test_game_analytics_methods() {
    if !python3_available() {
        return;
    }
    let temp = tempfile::tempdir().unwrap();
    let settings = mock_settings(temp.path());

    let plan = vec![
        action("lol", "fetch_static_data", json!({"ddragon_version": "14.1.1"})),
        action("game_analytics", "plan_build", json!({"ally_champion": "gnar"})),
        action("lol", "suggest_items", json!({"ally_champion": "nobody"})),
    ];
    let results = execute_plan(&plan, &settings).await;
    assert_prefix_matches(&results, &plan);

    assert!(results[0].ok);
    assert_eq!(results[0].result.as_ref().unwrap()["version"], "14.1.1");
    assert!(results[1].ok);
    assert_eq!(results[1].result.as_ref().unwrap()["champion"], "gnar");
    assert!(!results[2].ok);
    assert_eq!(results[2].error.as_deref(), Some("unknown champion"));

    let log = read_call_log(temp.path());
    let calls: Vec<(String, u64)> = log
        .iter()
        .filter(|e| e["provider"] == "lol")
        .map(|e| (e["method"].as_str().unwrap().to_string(), e["id"].as_u64().unwrap()))
        .collect();
    assert_eq!(
        calls,
        vec![
            ("initialize".to_string(), 1),
            ("fetch_static_data".to_string(), 2),
            ("tools/call".to_string(), 3),
            ("tools/call".to_string(), 4),
        ]
    );
    let cwd = std::path::PathBuf::from(log[0]["cwd"].as_str().unwrap());
    assert_eq!(cwd.canonicalize().unwrap(), temp.path().canonicalize().unwrap());
}
