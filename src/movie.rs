use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{GateError, GateResult};

/// Store-assigned movie identifier. Immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry as held by the stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub description: Option<String>,
    /// Inclusive access threshold. Drafts cannot omit it; `None` only shows up
    /// on records written before ratings were enforced.
    pub min_age: Option<u32>,
    pub genre: Option<String>,
    /// Running time in minutes.
    pub duration: Option<u32>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
}

/// Every mutable movie field. Used for both create and full-replace update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDraft {
    pub title: String,
    pub description: Option<String>,
    pub min_age: Option<u32>,
    pub genre: Option<String>,
    pub duration: Option<u32>,
    pub poster_url: Option<String>,
    pub trailer_url: Option<String>,
}

impl MovieDraft {
    pub fn new(title: impl Into<String>, min_age: u32) -> Self {
        Self {
            title: title.into(),
            min_age: Some(min_age),
            ..Self::default()
        }
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    /// Rejects drafts that would violate the catalog invariants.
    pub fn validate(&self) -> GateResult<()> {
        if self.title.trim().is_empty() {
            return Err(GateError::validation("title", "must not be empty"));
        }
        if self.min_age.is_none() {
            return Err(GateError::validation("minAge", "is required"));
        }
        if self.duration == Some(0) {
            return Err(GateError::validation("duration", "must be a positive number of minutes"));
        }
        Ok(())
    }

    /// Materializes the draft under `id`. Callers validate first.
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            description: self.description,
            min_age: self.min_age,
            genre: self.genre,
            duration: self.duration,
            poster_url: self.poster_url,
            trailer_url: self.trailer_url,
        }
    }
}

impl Movie {
    /// Inclusive threshold check used by the age filter. Unrated movies never match.
    pub fn suitable_for(&self, age: i64) -> bool {
        self.min_age.is_some_and(|min| i64::from(min) <= age)
    }

    pub fn title_contains(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
    }

    pub fn in_genre(&self, genre: &str) -> bool {
        self.genre
            .as_deref()
            .is_some_and(|g| g.to_lowercase() == genre.trim().to_lowercase())
    }
}
