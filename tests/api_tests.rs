#![cfg(feature = "api")]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use playlist_analyzer_rust::api::server::{build_router, AppState};
use playlist_analyzer_rust::catalog::InMemoryCatalog;
use playlist_analyzer_rust::config::ConfigBuilder;
use playlist_analyzer_rust::{AggregatorOptions, Config, PlaylistAggregator};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> axum::Router {
    app_with(Config::default())
}

fn app_with(config: Config) -> axum::Router {
    let catalog = InMemoryCatalog::new(50).with_playlist(
        "PLdemo",
        Some(("Demo Playlist", "Demo Channel")),
        &[("a", "PT1H"), ("b", "PT30M"), ("c", "PT15M45S"), ("d", "PT1S")],
    );
    let aggregator = PlaylistAggregator::new(Arc::new(catalog), AggregatorOptions::default());
    build_router(AppState {
        aggregator,
        config: Arc::new(config),
    })
}

async fn get(uri: &str) -> (StatusCode, Value) {
    get_from(app(), uri).await
}

async fn get_from(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_analyze_full_playlist() {
    let (status, body) =
        get("/api/analyze?url=https%3A%2F%2Fwww.youtube.com%2Fplaylist%3Flist%3DPLdemo").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["playlistTitle"], "Demo Playlist");
    assert_eq!(body["channelName"], "Demo Channel");
    assert_eq!(body["totalVideos"], 4);
    assert_eq!(body["range"], "1-4");
    assert_eq!(body["rangeVideos"], 4);
    // 3600 + 1800 + 945 + 1 = 6346 seconds
    assert_eq!(body["total"]["1x"]["hours"], 1);
    assert_eq!(body["total"]["1x"]["minutes"], 45);
    assert_eq!(body["total"]["1x"]["seconds"], 46);
    assert_eq!(body["total"]["2x"]["minutes"], 52);
    assert_eq!(body["total"]["2x"]["seconds"], 53);
    assert_eq!(body["averageVideo"]["minutes"], 26);
    assert_eq!(body["averageVideo"]["seconds"], 26);
    assert_eq!(body["totalHours"], 1.76);
    assert!(body.get("warnings").is_none());
}

#[tokio::test]
async fn test_analyze_range() {
    let (status, body) =
        get("/api/analyze?url=https%3A%2F%2Fyoutube.com%2Fplaylist%3Flist%3DPLdemo&start=2&end=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["range"], "2-3");
    assert_eq!(body["rangeVideos"], 2);
    assert_eq!(body["total"]["1x"]["minutes"], 45);
    assert_eq!(body["total"]["1x"]["seconds"], 45);
}

#[tokio::test]
async fn test_analyze_invalid_url() {
    let (status, body) = get("/api/analyze?url=https%3A%2F%2Fexample.com%2F").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid playlist URL");

    let (status, body) = get("/api/analyze").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid playlist URL");
}

#[tokio::test]
async fn test_plan_endpoint() {
    let (status, body) =
        get("/api/plan?totalHours=10&speed=2x&start=2024-01-01T00:00&deadline=2024-01-06T00:00").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["achievable"], true);
    assert_eq!(body["studyDays"], 5);
    assert_eq!(body["secondsPerDay"], 3600);
    assert_eq!(body["dayBreakdown"][0], "Mon, Jan 1: 1h 0m 0s/day");
}

#[tokio::test]
async fn test_plan_not_achievable() {
    let (status, body) =
        get("/api/plan?totalHours=10&start=2024-01-06T10:00&deadline=2024-01-06T09:00").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["achievable"], false);
    assert!(body.get("studyDays").is_none());
}

#[tokio::test]
async fn test_plan_unreadable_hours_is_json_error() {
    let (status, body) = get("/api/plan?totalHours=abc&start=2024-01-01&deadline=2024-01-03").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "totalHours must be a non-negative number");
}

#[tokio::test]
async fn test_duplicate_query_key_is_json_error() {
    let (status, body) = get("/api/plan?totalHours=1&totalHours=2&start=2024-01-01&deadline=2024-01-03").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_plan_span_is_bounded() {
    let (status, body) = get("/api/plan?totalHours=1&start=0001-01-01&deadline=9999-12-31").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Plans can span at most 366 days");

    let app = app_with(ConfigBuilder::new().with_max_plan_days(7).build());
    let (status, body) = get_from(app, "/api/plan?totalHours=7&start=2024-01-01&deadline=2024-01-08").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["studyDays"], 7);

    let app = app_with(ConfigBuilder::new().with_max_plan_days(7).build());
    let (status, _) = get_from(app, "/api/plan?totalHours=7&start=2024-01-01&deadline=2024-01-09").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = get("/api/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}
