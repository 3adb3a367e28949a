//! End-to-end tests for the HTTP API
//!
//! These drive the full router (payload mapping, engine, stores) with
//! in-memory backends, plus one run against sled.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for .oneshot()

use watchgate::app_state::AppState;
use watchgate::config::{GateConfig, StoreBackend};
use watchgate::web::build_router;

fn test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::in_memory());
    let app = build_router(state.clone(), &["http://localhost:4200".to_string()]);
    (app, state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn seed(app: &Router) {
    for movie in [
        json!({"title": "Kids Fun", "minAge": 0, "genre": "Family", "duration": 85}),
        json!({"title": "Horror Night", "minAge": 18, "genre": "Horror",
               "posterUrl": "https://img.example/horror.jpg"}),
        json!({"title": "The Great Escape", "minAge": 12, "genre": "War"}),
    ] {
        let (status, _) = send(app, "POST", "/movies", Some(movie)).await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn create_and_fetch_movie() {
    let (app, _) = test_app();
    let (status, created) = send(
        &app,
        "POST",
        "/movies",
        Some(json!({"title": "Kids Fun", "minAge": 0, "trailerUrl": "https://v.example/kf"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["trailerUrl"], "https://v.example/kf");

    let (status, fetched) = send(&app, "GET", "/movies/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn missing_movie_is_404() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/movies/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("error").is_some());
}

#[tokio::test]
async fn invalid_draft_is_400() {
    let (app, _) = test_app();
    let (status, _) = send(&app, "POST", "/movies", Some(json!({"title": "No Rating"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/movies", Some(json!({"title": "", "minAge": 3}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({"title": "Neg", "minAge": -4});
    let (status, _) = send(&app, "POST", "/movies", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn browse_by_age_search_and_genre() {
    let (app, _) = test_app();
    seed(&app).await;

    let (_, list) = send(&app, "GET", "/movies", None).await;
    assert_eq!(list.as_array().unwrap().len(), 3);

    let (_, twelve) = send(&app, "GET", "/movies/age/12", None).await;
    let titles: Vec<&str> = twelve
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Kids Fun", "The Great Escape"]);

    let (_, found) = send(&app, "GET", "/movies/search?title=ESCAPE", None).await;
    assert_eq!(found[0]["title"], "The Great Escape");

    let (_, horror) = send(&app, "GET", "/movies/genre/horror", None).await;
    assert_eq!(horror.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_and_delete_movie() {
    let (app, _) = test_app();
    seed(&app).await;

    let (status, updated) = send(
        &app,
        "PUT",
        "/movies/2",
        Some(json!({"title": "Horror Night II", "minAge": 16})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 2);
    assert_eq!(updated["minAge"], 16);

    let body = json!({"title": "X", "minAge": 1});
    let (status, _) = send(&app, "PUT", "/movies/9", Some(body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/movies/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", "/movies/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "GET", "/movies/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn access_check_grants_denies_and_logs() {
    let (app, state) = test_app();
    seed(&app).await;

    let (status, granted) = send(
        &app,
        "POST",
        "/access/check",
        Some(json!({"movieId": 1, "detectedAge": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(granted["accessGranted"], true);
    assert!(granted["message"].as_str().unwrap().contains("Enjoy"));
    assert_eq!(granted["movie"]["title"], "Kids Fun");

    let (status, denied) = send(
        &app,
        "POST",
        "/access/check",
        Some(json!({"movieId": 2, "detectedAge": 15, "userId": null})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(denied["accessGranted"], false);
    let message = denied["message"].as_str().unwrap();
    assert!(message.contains("18") && message.contains("15"));

    let (status, _) = send(
        &app,
        "POST",
        "/access/check",
        Some(json!({"movieId": 999, "detectedAge": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, anon) = send(
        &app,
        "POST",
        "/access/check",
        Some(json!({"movieId": 2, "detectedAge": 18, "userId": 77})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(anon["accessGranted"], true);

    assert_eq!(state.audit.list().unwrap().len(), 3);

    let (_, logs) = send(&app, "GET", "/access/logs?granted=false", None).await;
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["denialReason"], "Age restriction");
    assert_eq!(logs[0]["detectedAge"], 15);

    let (_, by_movie) = send(&app, "GET", "/access/logs?movieId=2", None).await;
    assert_eq!(by_movie.as_array().unwrap().len(), 2);
    assert!(by_movie[1]["userId"].is_null());

    let (status, report) = send(&app, "GET", "/access/logs/verify", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["records"], 3);
}

#[tokio::test]
async fn conflicting_audit_filters_are_rejected() {
    let (app, _) = test_app();
    let (status, _) = send(&app, "GET", "/access/logs?userId=1&granted=true", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (app, _) = test_app();
    let (status, body) = send(&app, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn sled_backend_serves_and_persists() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let config = GateConfig {
        data_dir: dir.path().to_str().unwrap().to_string(),
        backend: StoreBackend::Sled,
        ..GateConfig::default()
    };

    {
        let state = Arc::new(AppState::from_config(&config).expect("sled state"));
        let app = build_router(state, &config.cors_origins);
        seed(&app).await;
        let (status, _) = send(
            &app,
            "POST",
            "/access/check",
            Some(json!({"movieId": 2, "detectedAge": 21})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let state = Arc::new(AppState::from_config(&config).expect("sled state reopen"));
    let app = build_router(state, &config.cors_origins);
    let (_, list) = send(&app, "GET", "/movies", None).await;
    assert_eq!(list.as_array().unwrap().len(), 3);
    let (_, logs) = send(&app, "GET", "/access/logs", None).await;
    assert_eq!(logs.as_array().unwrap().len(), 1);
}
