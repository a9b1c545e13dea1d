//! End-to-end tests for the HTTP API, driven through the router without a socket.
#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use guild_ranks::db::repositories::LocalRepository;
use guild_ranks::db::{FullRepository, RepositoryConfig};
use guild_ranks::http::{create_router, AppState};
use guild_ranks::models::Role;
use support::{record, summary};

fn app_with(repo: &LocalRepository) -> Router {
    let shared: Arc<dyn FullRepository> = Arc::new(repo.clone());
    create_router(AppState::new(shared))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

/// Scenario store: three Tank players and a healer with one bad record.
fn guild_repo() -> LocalRepository {
    let repo = LocalRepository::new();
    repo.seed(
        vec![summary("Mira", "Quedasanta", Role::Healer, "0", "0", "0")],
        vec![
            record("Alice", "Tank", Role::Damage, 1000.0, 80.0),
            record("Alice", "Tank", Role::Damage, "NaN", 90.0),
            record("Alice", "Tank", Role::Damage, 1001.0, 81.0),
            record("Bob", "Tank", Role::Damage, 1800.0, 70.0),
            record("Cara", "Tank", Role::Damage, 1200.0, 75.0),
            record("Mira", "Quedasanta", Role::Healer, 600.0, 95.0),
        ],
    );
    repo
}

#[tokio::test]
async fn test_health() {
    let app = app_with(&LocalRepository::new());
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "connected");
}

#[tokio::test]
async fn test_submit_record_then_version_changes() {
    let repo = LocalRepository::new();
    let app = app_with(&repo);
    let (_, before) = get(&app, "/v1/version").await;

    let (status, body) = post(
        &app,
        "/v1/records",
        json!({"playerName": "Alice", "className": "Tank", "metricValue": "1500"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["metricValue"], "1500");
    assert_eq!(body["data"]["encounterType"], "Dungeon");
    assert_eq!(body["data"]["role"], "damage");

    let (_, after) = get(&app, "/v1/version").await;
    assert!(
        after["data"]["dataVersion"].as_u64().unwrap()
            > before["data"]["dataVersion"].as_u64().unwrap()
    );
}

#[tokio::test]
async fn test_submit_record_without_metric_is_bad_request() {
    let repo = LocalRepository::new();
    let app = app_with(&repo);
    let (status, body) = post(
        &app,
        "/v1/records",
        json!({"playerName": "Alice", "className": "Tank"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(repo.record_count(), 0);
}

#[tokio::test]
async fn test_register_and_fetch_player() {
    let app = app_with(&LocalRepository::new());
    let (status, body) = post(
        &app,
        "/v1/players",
        json!({"name": "Mira", "className": "Quedasanta"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["role"], "healer");
    assert_eq!(body["data"]["guildTag"], "INFERNUS");
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = get(&app, &format!("/v1/players/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Mira");

    let (status, _) = send(&app, Method::DELETE, &format!("/v1/players/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, &format!("/v1/players/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_derived_summaries_exclude_invalid_metrics() {
    let app = app_with(&guild_repo());
    let (status, body) = get(&app, "/v1/summaries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 4);

    let alice = &body["data"]["items"][0];
    assert_eq!(alice["name"], "Alice");
    assert_eq!(alice["avgMetric"], "1001");
    assert_eq!(alice["maxMetric"], "1001");
    assert_eq!(alice["avgRating"], "83.7");
}

#[tokio::test]
async fn test_derived_summaries_use_configured_guild_tag() {
    let config = RepositoryConfig::from_toml_str("[players]\ndefault_guild_tag = \"ZED\"\n").unwrap();
    let shared: Arc<dyn FullRepository> = Arc::new(guild_repo());
    let app = create_router(AppState::from_config(shared, &config));

    let (_, body) = get(&app, "/v1/leaderboard").await;
    let entries = body["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 3);
    for entry in entries {
        assert_eq!(entry["summary"]["guildTag"], "ZED");
    }

    // a stored summary keeps its own tag
    let (_, body) = get(&app, "/v1/leaderboard?role=healer").await;
    assert_eq!(body["data"]["entries"][0]["summary"]["guildTag"], "INFERNUS");
}

#[tokio::test]
async fn test_leaderboard_orders_by_average() {
    let app = app_with(&guild_repo());
    let (status, body) = get(&app, "/v1/leaderboard?role=damage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metricLabel"], "DPS");
    assert_eq!(body["data"]["source"], "derived");

    let entries = body["data"]["entries"].as_array().unwrap();
    let names: Vec<&str> = entries
        .iter()
        .map(|e| e["summary"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Bob", "Cara", "Alice"]);
    assert_eq!(entries[2]["rank"], 3);
}

#[tokio::test]
async fn test_leaderboard_healers_and_filter() {
    let app = app_with(&guild_repo());
    let (_, body) = get(&app, "/v1/leaderboard?role=hps").await;
    let entries = body["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["summary"]["name"], "Mira");
    assert_eq!(entries[0]["summary"]["avgMetric"], "600");

    let (_, body) = get(&app, "/v1/leaderboard?q=ali").await;
    let entries = body["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["rank"], 3);
}

#[tokio::test]
async fn test_leaderboard_from_stored_summaries() {
    let app = app_with(&guild_repo());
    let (_, body) = get(&app, "/v1/leaderboard?role=healer&source=stored").await;
    assert_eq!(body["data"]["source"], "stored");
    assert_eq!(body["data"]["entries"][0]["summary"]["avgMetric"], "0");
}

#[tokio::test]
async fn test_leaderboard_unknown_role_is_bad_request() {
    let app = app_with(&guild_repo());
    let (status, body) = get(&app, "/v1/leaderboard?role=tank").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_percentile_lookup() {
    let app = app_with(&guild_repo());
    let (status, body) = get(&app, "/v1/percentile?class_name=Tank&player_name=Cara").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rank"], 2);
    assert_eq!(body["data"]["classSize"], 3);
    assert_eq!(body["data"]["percentile"], 67);

    let (_, body) = get(&app, "/v1/percentile?class_name=Tank&player_name=Zed").await;
    assert_eq!(body["data"]["rank"], 0);
    assert!(body["data"]["percentile"].is_null());

    let (status, _) = get(&app, "/v1/percentile?class_name=Tank").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_statistics_endpoints() {
    let app = app_with(&guild_repo());
    let (status, body) = get(&app, "/v1/statistics/classes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalPlayers"], 4);
    assert_eq!(body["data"]["roles"]["healers"], 1);
    assert_eq!(body["data"]["classes"][0]["className"], "Tank");

    let (status, body) = get(&app, "/v1/statistics/players/alice").await;
    assert_eq!(status, StatusCode::OK);
    let class = &body["data"]["classes"][0];
    assert_eq!(class["className"], "Tank");
    assert_eq!(class["matches"], 3);
    assert_eq!(class["percentile"], 33);
}

#[tokio::test]
async fn test_refresh_summary_endpoint() {
    let repo = guild_repo();
    let app = app_with(&repo);
    let (status, body) = post(
        &app,
        "/v1/summaries/refresh",
        json!({"playerName": "Mira", "className": "Quedasanta"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["avgMetric"], "600");
    assert_eq!(body["data"]["avgRating"], "95.0");
    assert_eq!(repo.player_count(), 1);

    let (status, _) = post(
        &app,
        "/v1/summaries/refresh",
        json!({"playerName": "", "className": "Tank"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_diagnose_then_fix_through_api() {
    let repo = guild_repo();
    let app = app_with(&repo);

    let (status, body) = get(&app, "/v1/admin/repair").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["mode"], "diagnose");
    assert_eq!(body["data"]["invalidRecordCount"], 1);

    let (status, body) = send(&app, Method::POST, "/v1/admin/repair?mode=fix", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["mode"], "fix");
    assert_eq!(body["data"]["recordsFixed"], 1);

    let (_, body) = get(&app, "/v1/admin/repair").await;
    assert_eq!(body["data"]["invalidRecordCount"], 0);
}

#[tokio::test]
async fn test_repair_mode_validation() {
    let app = app_with(&guild_repo());
    let (status, _) = send(&app, Method::POST, "/v1/admin/repair", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::POST, "/v1/admin/repair?mode=nuke", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_reset_and_clear() {
    let repo = guild_repo();
    let app = app_with(&repo);

    let (_, body) = send(&app, Method::POST, "/v1/admin/repair?mode=reset", None).await;
    assert_eq!(body["data"]["previousRecordCount"], 6);
    assert_eq!(body["data"]["recordCount"], 3);

    let (status, _) = send(&app, Method::POST, "/v1/admin/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, status_body) = get(&app, "/v1/status").await;
    assert_eq!(status_body["data"]["summaryCount"], 0);
    assert_eq!(status_body["data"]["recordCount"], 0);
}

#[tokio::test]
async fn test_unreachable_store_is_service_unavailable() {
    let repo = guild_repo();
    let app = app_with(&repo);
    repo.set_healthy(false);

    let (status, body) = get(&app, "/v1/leaderboard").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "STORE_UNAVAILABLE");

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "disconnected");
}

#[tokio::test]
async fn test_malformed_requests_get_error_envelope() {
    let app = app_with(&LocalRepository::new());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/records")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_REQUEST");
    assert!(body["timestamp"].is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/records")
        .body(Body::from(json!({"playerName": "A"}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);

    let (status, body) = get(&app, "/v1/leaderboard?source=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REQUEST");

    let (status, body) = get(&app, "/v1/players/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}
