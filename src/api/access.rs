use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    api::{
        payload::{AccessRequest, AccessResponse},
        run_blocking,
    },
    api_errors::AppError,
    app_state::AppState,
    identity::UserId,
    movie::MovieId,
};

pub async fn check_access(
    State(st): State<Arc<AppState>>,
    Json(req): Json<AccessRequest>,
) -> Result<Json<AccessResponse>, AppError> {
    let engine = st.engine.clone();
    let result = run_blocking(move || {
        engine.check_access(
            MovieId(req.movie_id),
            req.detected_age,
            req.user_id.map(UserId),
        )
    })
    .await?;
    Ok(Json(result.into()))
}
