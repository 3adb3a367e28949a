use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    api::{
        payload::{movie_list, MoviePayload},
        run_blocking,
    },
    api_errors::AppError,
    app_state::AppState,
    errors::GateError,
    movie::MovieId,
};

pub async fn list_movies(
    State(st): State<Arc<AppState>>,
) -> Result<Json<Vec<MoviePayload>>, AppError> {
    let catalog = st.catalog.clone();
    let movies = run_blocking(move || catalog.list()).await?;
    Ok(Json(movie_list(&movies)))
}

pub async fn get_movie(
    State(st): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<MoviePayload>, AppError> {
    let catalog = st.catalog.clone();
    let movie = run_blocking(move || catalog.get(MovieId(id))).await?;
    Ok(Json(MoviePayload::from_movie(&movie)))
}

pub async fn movies_for_age(
    State(st): State<Arc<AppState>>,
    Path(age): Path<i64>,
) -> Result<Json<Vec<MoviePayload>>, AppError> {
    let catalog = st.catalog.clone();
    let movies = run_blocking(move || catalog.list_by_max_age(age)).await?;
    Ok(Json(movie_list(&movies)))
}

#[derive(Deserialize)]
pub struct SearchParams {
    title: String,
}

pub async fn search_movies(
    State(st): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<MoviePayload>>, AppError> {
    let catalog = st.catalog.clone();
    let movies = run_blocking(move || catalog.search_by_title(&params.title)).await?;
    Ok(Json(movie_list(&movies)))
}

pub async fn movies_by_genre(
    State(st): State<Arc<AppState>>,
    Path(genre): Path<String>,
) -> Result<Json<Vec<MoviePayload>>, AppError> {
    let catalog = st.catalog.clone();
    let movies = run_blocking(move || catalog.list_by_genre(&genre)).await?;
    Ok(Json(movie_list(&movies)))
}

pub async fn create_movie(
    State(st): State<Arc<AppState>>,
    Json(req): Json<MoviePayload>,
) -> Result<(StatusCode, Json<MoviePayload>), AppError> {
    let draft = req.into_draft()?;
    let catalog = st.catalog.clone();
    let movie = run_blocking(move || catalog.create(draft)).await?;
    Ok((StatusCode::CREATED, Json(MoviePayload::from_movie(&movie))))
}

pub async fn update_movie(
    State(st): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<MoviePayload>,
) -> Result<Json<MoviePayload>, AppError> {
    let draft = req.into_draft()?;
    let catalog = st.catalog.clone();
    let movie = run_blocking(move || catalog.update(MovieId(id), draft)).await?;
    Ok(Json(MoviePayload::from_movie(&movie)))
}

pub async fn delete_movie(
    State(st): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let catalog = st.catalog.clone();
    if run_blocking(move || catalog.delete(MovieId(id))).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(GateError::not_found("movie", id).into())
    }
}
