//! Boundary shapes for the HTTP API and the explicit mapping to and from the
//! internal movie types.

use serde::{Deserialize, Serialize};

use crate::decision::AccessResult;
use crate::errors::{GateError, GateResult};
use crate::movie::{Movie, MovieDraft};

/// Movie as it crosses the API boundary. `id` is output-only: it is filled
/// from the stored record and ignored on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub min_age: Option<i64>,
    pub genre: Option<String>,
    pub duration: Option<i64>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
}

impl MoviePayload {
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            id: Some(movie.id.0),
            title: movie.title.clone(),
            description: movie.description.clone(),
            min_age: movie.min_age.map(i64::from),
            genre: movie.genre.clone(),
            duration: movie.duration.map(i64::from),
            poster_url: movie.poster_url.clone(),
            trailer_url: movie.trailer_url.clone(),
        }
    }

    /// Converts to a validated draft. Negative ages and non-positive durations
    /// are rejected here rather than wrapped into unsigned fields.
    pub fn into_draft(self) -> GateResult<MovieDraft> {
        let min_age = self
            .min_age
            .map(|v| {
                u32::try_from(v)
                    .map_err(|_| GateError::validation("minAge", "must be a non-negative integer"))
            })
            .transpose()?;
        let duration = self
            .duration
            .map(|v| match u32::try_from(v) {
                Ok(minutes) if minutes > 0 => Ok(minutes),
                _ => Err(GateError::validation(
                    "duration",
                    "must be a positive number of minutes",
                )),
            })
            .transpose()?;

        let draft = MovieDraft {
            title: self.title,
            description: self.description,
            min_age,
            genre: self.genre,
            duration,
            poster_url: self.poster_url,
            trailer_url: self.trailer_url,
        };
        draft.validate()?;
        Ok(draft)
    }
}

pub fn movie_list(movies: &[Movie]) -> Vec<MoviePayload> {
    movies.iter().map(MoviePayload::from_movie).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    pub movie_id: u64,
    pub detected_age: i32,
    #[serde(default)]
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    pub access_granted: bool,
    pub message: String,
    pub movie: MoviePayload,
}

impl From<AccessResult> for AccessResponse {
    fn from(result: AccessResult) -> Self {
        Self {
            access_granted: result.access_granted,
            message: result.message,
            movie: MoviePayload::from_movie(&result.movie),
        }
    }
}
