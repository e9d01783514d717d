//! API integration tests
//!
//! Drives the full router against an in-memory aggregate store and checks
//! the wire contract of every endpoint.

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use ice_watch::{
    config::{Config, CosmosConfig, ServerConfig},
    create_app,
    store::MemoryStore,
    AppState,
};
use serde_json::{json, Value};
use shared::SensorAggregateRecord;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

// ============================================================================
// Helpers
// ============================================================================

fn test_config(static_dir: PathBuf) -> Config {
    Config {
        environment: "test".to_string(),
        server: ServerConfig {
            static_dir,
            ..ServerConfig::default()
        },
        cosmos: CosmosConfig {
            endpoint: "https://localhost:8081".to_string(),
            key: "a2V5".to_string(),
            database: "RideauCanalDB".to_string(),
            container: "SensorAggregations".to_string(),
            request_timeout_secs: 5,
            partition_by_location: true,
        },
    }
}

fn app_with(store: Arc<MemoryStore>) -> Router {
    let config = test_config(PathBuf::from("/nonexistent/ice-watch-public"));
    create_app(AppState::new(store, config))
}

fn aggregate(location: &str, time: &str, ice: f64, status: &str) -> SensorAggregateRecord {
    SensorAggregateRecord {
        location: Some(location.to_string()),
        window_end_time: Some(time.to_string()),
        avg_ice_thickness_cm: Some(ice),
        avg_surface_temperature_c: Some(-1.5),
        max_snow_accumulation_cm: Some(2.0),
        avg_external_temperature_c: Some(-7.25),
        safety_status: Some(status.to_string()),
    }
}

fn minutes_ago(minutes: i64) -> String {
    (chrono::Utc::now() - chrono::Duration::minutes(minutes))
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ============================================================================
// /api/latest
// ============================================================================

#[tokio::test]
async fn test_latest_round_trip() {
    let store = Arc::new(MemoryStore::new(vec![aggregate(
        "Fifth Avenue",
        "2024-01-15T10:00:00Z",
        22.5,
        "Safe",
    )]));

    let (status, body) = get(app_with(store), "/api/latest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "data": [{
                "sensorId": "fifth",
                "location": "Fifth Avenue",
                "timestamp": "2024-01-15T10:00:00Z",
                "avgIceThickness": 22.5,
                "avgSurfaceTemperature": -1.5,
                "maxSnowAccumulation": 2.0,
                "avgExternalTemperature": -7.25,
                "safetyStatus": "Safe"
            }]
        })
    );
}

#[tokio::test]
async fn test_latest_registry_order_and_newest_record() {
    let store = Arc::new(MemoryStore::new(vec![
        aggregate("NAC", "2024-01-15T10:05:00Z", 18.0, "Caution"),
        aggregate("Dow's Lake", "2024-01-15T09:55:00Z", 31.0, "Safe"),
        aggregate("Dow's Lake", "2024-01-15T10:05:00Z", 30.5, "Safe"),
        aggregate("Dow's Lake", "2024-01-15T10:00:00Z", 30.8, "Safe"),
    ]));

    let (status, body) = get(app_with(store), "/api/latest").await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["sensorId"], "dows");
    assert_eq!(data[0]["timestamp"], "2024-01-15T10:05:00Z");
    assert_eq!(data[0]["avgIceThickness"], 30.5);
    assert_eq!(data[1]["sensorId"], "nac");
}

#[tokio::test]
async fn test_latest_empty_store() {
    let (status, body) = get(app_with(Arc::new(MemoryStore::default())), "/api/latest").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "data": [] }));
}

#[tokio::test]
async fn test_latest_store_failure_is_generic() {
    let store = Arc::new(
        MemoryStore::new(vec![aggregate("NAC", "2024-01-15T10:00:00Z", 20.0, "Safe")])
            .failing_for("dows"),
    );

    let (status, body) = get(app_with(store), "/api/latest").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Latest query failed" }));
}

// ============================================================================
// /api/history/:sensorId
// ============================================================================

#[tokio::test]
async fn test_history_returns_bare_array_in_window() {
    let recent = minutes_ago(10);
    let older = minutes_ago(40);
    let store = Arc::new(MemoryStore::new(vec![
        aggregate("Dow's Lake", &recent, 28.0, "Safe"),
        aggregate("Dow's Lake", &minutes_ago(90), 29.0, "Safe"),
        aggregate("Dow's Lake", &older, 28.5, "Caution"),
        aggregate("NAC", &recent, 12.0, "Unsafe"),
    ]));

    let (status, body) = get(app_with(store), "/api/history/dows").await;

    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().expect("history is a bare array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["windowEndTime"], older.as_str());
    assert_eq!(records[1]["windowEndTime"], recent.as_str());
    assert!(records.iter().all(|r| r.get("timestamp").is_none()));
    assert!(records.iter().all(|r| r["sensorId"] == "dows"));
}

#[tokio::test]
async fn test_history_unknown_sensor() {
    let store = Arc::new(MemoryStore::default());

    let (status, body) = get(app_with(store.clone()), "/api/history/bogus").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Unknown sensor id" }));
    assert_eq!(store.query_count(), 0);
}

#[tokio::test]
async fn test_history_store_failure() {
    let store = Arc::new(MemoryStore::default().failing_for("nac"));

    let (status, body) = get(app_with(store), "/api/history/nac").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "History query failed" }));
}

// ============================================================================
// /api/status
// ============================================================================

#[tokio::test]
async fn test_status_unknown_without_data() {
    let (status, body) = get(app_with(Arc::new(MemoryStore::default())), "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "overallStatus": "Unknown" }));
}

#[tokio::test]
async fn test_status_most_severe_wins() {
    let store = Arc::new(MemoryStore::new(vec![
        aggregate("Dow's Lake", "2024-01-15T10:00:00Z", 30.0, "Safe"),
        aggregate("Fifth Avenue", "2024-01-15T10:00:00Z", 14.0, "Unsafe"),
        aggregate("NAC", "2024-01-15T10:00:00Z", 20.0, "Caution"),
    ]));

    let (status, body) = get(app_with(store), "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overallStatus"], "Unsafe");
}

#[tokio::test]
async fn test_status_failure_body() {
    let store = Arc::new(MemoryStore::default().failing_for("fifth"));

    let (status, body) = get(app_with(store), "/api/status").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "success": false, "error": "Status failed" }));
}

// ============================================================================
// Health and frontend
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app_with(Arc::new(MemoryStore::default())), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_frontend_fallback_serves_index() {
    let dir = std::env::temp_dir().join(format!("ice-watch-public-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<html>ice watch</html>").unwrap();

    let app = create_app(AppState::new(
        Arc::new(MemoryStore::default()),
        test_config(dir.clone()),
    ));
    let response = app
        .oneshot(
            Request::builder()
                .uri("/some/client/route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>ice watch</html>");

    std::fs::remove_dir_all(&dir).ok();
}
