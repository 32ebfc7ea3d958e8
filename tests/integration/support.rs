//! Mock providers shared by the integration tests.
//!
//! The stdio mocks are small python3 scripts written to a temp dir; tests
//! that need them return early when python3 is not installed.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;

use plan_relay::models::settings::LaunchSpec;
use plan_relay::RelaySettings;

/// MCP server standing in for the filesystem, git and music providers.
///
/// Filesystem tools act on the real disk. Every request is appended to
/// `$MOCK_LOG` as one JSON line tagged with `$MOCK_NAME`.
pub const MOCK_MCP_SERVER: &str = r#"
import json, os, sys

LOG = os.environ.get("MOCK_LOG")
NAME = os.environ.get("MOCK_NAME", "mock")
AUTH_REQUIRED = os.environ.get("MOCK_AUTH_REQUIRED") == "1"
AUTH_BEGIN_FAILS = os.environ.get("MOCK_AUTH_BEGIN_FAILS") == "1"

def log(entry):
    if LOG:
        entry["provider"] = NAME
        with open(LOG, "a") as f:
            f.write(json.dumps(entry) + "\n")

def reply(msg_id, result):
    sys.stdout.write(json.dumps({"jsonrpc": "2.0", "id": msg_id, "result": result}) + "\n")
    sys.stdout.flush()

def text(value, is_error=False):
    if not isinstance(value, str):
        value = json.dumps(value)
    return {"content": [{"type": "text", "text": value}], "isError": is_error}

def call(name, args):
    if name == "create_directory":
        os.makedirs(args["path"], exist_ok=True)
        return text("Successfully created directory " + args["path"])
    if name == "write_file":
        with open(args["path"], "w") as f:
            f.write(args["content"])
        return text("Successfully wrote to " + args["path"])
    if name == "read_file":
        with open(args["path"]) as f:
            return text(f.read())
    if name.startswith("git_"):
        return text(name + " ok in " + args.get("repo_path", ""))
    if name == "whoami":
        if AUTH_REQUIRED:
            return text("Not authorized: OAuth login required", True)
        return text({"id": "user_1", "display_name": "Test User"})
    if name == "auth_begin":
        if AUTH_BEGIN_FAILS:
            return text("login service unavailable", True)
        return text({"auth_url": "https://accounts.example/authorize?state=abc"})
    if name == "search_track":
        return text({"id": "trk_42", "name": "Sunset", "query": args.get("query")})
    return text("unknown tool " + name, True)

print("mock provider ready", flush=True)
for line in sys.stdin:
    line = line.strip()
    if not line:
        continue
    try:
        msg = json.loads(line)
    except Exception:
        continue
    method = msg.get("method", "")
    msg_id = msg.get("id")
    if method == "initialize":
        log({"method": method, "argv": sys.argv[1:]})
        reply(msg_id, {"protocolVersion": "2024-11-05", "capabilities": {"tools": {}},
                       "serverInfo": {"name": NAME, "version": "0.1.0"}})
    elif method == "notifications/initialized":
        log({"method": method})
    elif method == "tools/call":
        params = msg.get("params", {})
        name, args = params.get("name", ""), params.get("arguments", {})
        log({"method": method, "name": name, "arguments": args})
        try:
            result = call(name, args)
        except Exception as e:
            result = text(str(e), True)
        reply(msg_id, result)
"#;

/// Line-framed JSON-RPC server standing in for the game analytics provider.
pub const MOCK_LINE_SERVER: &str = r#"
import json, os, sys

LOG = os.environ.get("MOCK_LOG")

for line in sys.stdin:
    line = line.strip()
    if not line:
        continue
    msg = json.loads(line)
    method, msg_id, params = msg.get("method"), msg.get("id"), msg.get("params") or {}
    if LOG:
        with open(LOG, "a") as f:
            f.write(json.dumps({"provider": "lol", "method": method, "id": msg_id,
                                "cwd": os.getcwd(), "params": params}) + "\n")
    if method == "initialize":
        result = {"ready": True}
    elif method == "fetch_static_data":
        result = {"version": params.get("ddragon_version"), "champions": 168}
    elif method == "tools/call" and params.get("name") == "plan_build":
        args = params.get("arguments", {})
        result = {"champion": args.get("ally_champion"), "items": ["Trinity Force"]}
    elif method == "tools/call":
        result = {"error": "unknown champion"}
    else:
        sys.stdout.write(json.dumps({"jsonrpc": "2.0", "id": msg_id,
                                     "error": {"code": -32601, "message": "no such method"}}) + "\n")
        sys.stdout.flush()
        continue
    sys.stdout.write(json.dumps({"jsonrpc": "2.0", "id": msg_id, "result": result}) + "\n")
    sys.stdout.flush()
"#;

pub fn python3_available() -> bool {
    Command::new("python3").arg("--version").output().is_ok()
}

pub fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).unwrap();
    path
}

/// Launch spec running `script` with python3, tagged for the call log.
pub fn mock_launch(script: &Path, name: &str, log: &Path) -> LaunchSpec {
    LaunchSpec::new("python3", &[&script.to_string_lossy()])
        .with_env("MOCK_NAME", name)
        .with_env("MOCK_LOG", &log.to_string_lossy())
}

/// A launch spec that can never start
pub fn broken_launch() -> LaunchSpec {
    LaunchSpec::new("/nonexistent/provider/binary", &[])
}

/// Settings with every stdio provider pointed at the mocks under `dir`.
/// The movie catalog points at an unreachable port unless overridden.
pub fn mock_settings(dir: &Path) -> RelaySettings {
    let mcp = write_script(dir, "mock_mcp_server.py", MOCK_MCP_SERVER);
    let line = write_script(dir, "mock_lol_server.py", MOCK_LINE_SERVER);
    let log = call_log_path(dir);

    let mut settings = RelaySettings::default();
    settings.filesystem = mock_launch(&mcp, "filesystem", &log);
    settings.git = mock_launch(&mcp, "git", &log);
    settings.spotify = mock_launch(&mcp, "spotify", &log);
    settings.lol = LaunchSpec::new("python3", &[&line.to_string_lossy()])
        .with_env("MOCK_LOG", &log.to_string_lossy());
    settings.movies.url = "http://127.0.0.1:9/mcp/jsonrpc".to_string();
    settings.movies.timeout_secs = 2;
    settings.response_timeout_secs = 15;
    settings.retry_delay_ms = 10;
    settings
}

pub fn call_log_path(dir: &Path) -> PathBuf {
    dir.join("calls.jsonl")
}

/// Entries of the call log, in order
pub fn read_call_log(dir: &Path) -> Vec<Value> {
    std::fs::read_to_string(call_log_path(dir))
        .unwrap_or_default()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

/// Tool names the given provider received through `tools/call`
pub fn tool_calls(log: &[Value], provider: &str) -> Vec<String> {
    log.iter()
        .filter(|e| e["provider"] == provider && e["method"] == "tools/call")
        .map(|e| e["name"].as_str().unwrap_or_default().to_string())
        .collect()
}

pub fn action(server: &str, tool: &str, args: Value) -> plan_relay::Action {
    plan_relay::Action::new(server, tool, args.as_object().cloned().unwrap_or_default())
}
