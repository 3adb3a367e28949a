use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    api::run_blocking,
    api_errors::AppError,
    app_state::AppState,
    audit_verifier::{verify_chain, ChainReport},
    decision::AccessDecision,
    identity::UserId,
    movie::MovieId,
};

/// At most one filter may be given; none lists the whole trail.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    user_id: Option<u64>,
    movie_id: Option<u64>,
    granted: Option<bool>,
}

pub async fn list_decisions(
    State(st): State<Arc<AppState>>,
    Query(q): Query<AuditQuery>,
) -> Result<Json<Vec<AccessDecision>>, AppError> {
    let audit = st.audit.clone();
    let records = match (q.user_id, q.movie_id, q.granted) {
        (Some(user), None, None) => run_blocking(move || audit.find_by_user(UserId(user))).await?,
        (None, Some(movie), None) => {
            run_blocking(move || audit.find_by_movie(MovieId(movie))).await?
        }
        (None, None, Some(granted)) => {
            run_blocking(move || audit.find_by_outcome(granted)).await?
        }
        (None, None, None) => run_blocking(move || audit.list()).await?,
        _ => {
            return Err(AppError::bad_request(
                "use at most one of userId, movieId, granted",
            ))
        }
    };
    Ok(Json(records))
}

pub async fn verify_decisions(
    State(st): State<Arc<AppState>>,
) -> Result<Json<ChainReport>, AppError> {
    let audit = st.audit.clone();
    let report = run_blocking(move || verify_chain(audit.as_ref())).await?;
    Ok(Json(report))
}
