use axum::{
    http::{header, HeaderValue, Method},
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    api::{
        access::check_access,
        audit::{list_decisions, verify_decisions},
        movies::{
            create_movie, delete_movie, get_movie, list_movies, movies_by_genre, movies_for_age,
            search_movies, update_movie,
        },
    },
    app_state::AppState,
};

/// Build the router exposing catalog, access-check and audit endpoints.
pub fn build_router(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    Router::new()
        // Catalog browsing and management
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/search", get(search_movies))
        .route("/movies/age/{age}", get(movies_for_age))
        .route("/movies/genre/{genre}", get(movies_by_genre))
        .route(
            "/movies/{id}",
            get(get_movie).put(update_movie).delete(delete_movie),
        )
        // Access decisions
        .route("/access/check", post(check_access))
        .route("/access/logs", get(list_decisions))
        .route("/access/logs/verify", get(verify_decisions))
        // health endpoints
        .route("/healthz", get(healthz))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
