//! Remote Catalog Integration Tests
//!
//! The movie catalog behind an in-process axum JSON-RPC endpoint.

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use plan_relay::{execute_plan, RelaySettings};

use super::support::action;

#[derive(Clone, Default)]
struct CatalogState {
    initialize_calls: Arc<AtomicUsize>,
    tool_calls: Arc<AtomicUsize>,
}

async fn jsonrpc(State(state): State<CatalogState>, Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default();
    let params = &request["params"];

    let body = match method {
        "initialize" => {
            state.initialize_calls.fetch_add(1, Ordering::SeqCst);
            json!({"jsonrpc": "2.0", "id": id, "result": {"serverInfo": {"name": "movies"}}})
        }
        "tools/call" => {
            state.tool_calls.fetch_add(1, Ordering::SeqCst);
            let args = &params["arguments"];
            match params["name"].as_str().unwrap_or_default() {
                "search_movie" if args["title"] == "Alien" => json!({
                    "jsonrpc": "2.0", "id": id,
                    "result": {"title": "Alien", "year": 1979, "rating": 8.5}
                }),
                "search_movie" => json!({
                    "jsonrpc": "2.0", "id": id,
                    "result": {"error": format!("Movie '{}' not found", args["title"].as_str().unwrap_or_default())}
                }),
                "get_movie_recommendations" => json!({
                    "jsonrpc": "2.0", "id": id,
                    "result": {"genres": args["genres"], "min_rating": args["min_rating"], "movies": []}
                }),
                _ => json!({"jsonrpc": "2.0", "id": id, "error": "catalog offline"}),
            }
        }
        _ => json!({"jsonrpc": "2.0", "id": id, "error": {"code": -32601, "message": "Method not found"}}),
    };
    Json(body)
}

/// Serve the mock catalog on an ephemeral port; returns its JSON-RPC URL.
async fn spawn_catalog(state: CatalogState) -> String {
    let app = Router::new()
        .route("/mcp/jsonrpc", post(jsonrpc))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/mcp/jsonrpc", addr)
}

fn settings_for(url: &str) -> RelaySettings {
    let mut settings = RelaySettings::default();
    settings.movies.url = url.to_string();
    settings.movies.timeout_secs = 5;
    settings
}

#[tokio::test]
async fn test_catalog_results_and_errors() {
    let state = CatalogState::default();
    let url = spawn_catalog(state.clone()).await;
    let settings = settings_for(&url);

    let plan = vec![
        action("movies", "search_movie", json!({"title": "Alien"})),
        action("catalog", "search_movie", json!({"title": "Nope"})),
        action("movies", "get_random_movie", json!({})),
        action("movies", "get_movie_recommendations", json!({"genres": ["horror"]})),
    ];
    let results = execute_plan(&plan, &settings).await;
    assert_eq!(results.len(), 4);

    assert!(results[0].ok);
    assert_eq!(results[0].result.as_ref().unwrap()["year"], 1979);

    assert!(!results[1].ok);
    assert_eq!(results[1].error.as_deref(), Some("Movie 'Nope' not found"));
    assert!(results[1].result.is_none());

    // JSON-RPC error sent as a bare string
    assert!(!results[2].ok);
    assert_eq!(results[2].error.as_deref(), Some("catalog offline"));

    assert!(results[3].ok);
    let payload = results[3].result.as_ref().unwrap();
    assert_eq!(payload["genres"], json!(["horror"]));
    assert_eq!(payload["min_rating"], 7.0);

    assert_eq!(state.initialize_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.tool_calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_unsupported_catalog_tool_sends_nothing() {
    let state = CatalogState::default();
    let url = spawn_catalog(state.clone()).await;
    let settings = settings_for(&url);

    let plan = vec![action("movies", "stream_movie", json!({"title": "Alien"}))];
    let results = execute_plan(&plan, &settings).await;

    assert_eq!(
        results[0].error.as_deref(),
        Some("Tool 'stream_movie' is not supported by provider 'movies'")
    );
    assert_eq!(state.initialize_calls.load(Ordering::SeqCst), 0);
    assert_eq!(state.tool_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_http_error_status_is_transport_failure() {
    let app = Router::new().route(
        "/mcp/jsonrpc",
        post(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let settings = settings_for(&format!("http://{}/mcp/jsonrpc", addr));

    let plan = vec![action("movies", "get_random_movie", json!({}))];
    let results = execute_plan(&plan, &settings).await;
    assert_eq!(results.len(), 1);
    let error = results[0].error.as_deref().unwrap();
    assert!(error.starts_with("Transport error:"), "{}", error);
    assert!(error.contains("503"), "{}", error);
}
