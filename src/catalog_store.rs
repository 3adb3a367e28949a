use crate::errors::GateResult;
use crate::movie::{Movie, MovieDraft, MovieId};

/// Durable keyed storage of catalog entries.
///
/// Every read returns an owned snapshot. Listing operations return movies in
/// ascending id order.
pub trait CatalogStore: Send + Sync {
    /// Fails with `NotFound` when no movie has this id.
    fn get(&self, id: MovieId) -> GateResult<Movie>;

    fn list(&self) -> GateResult<Vec<Movie>>;

    /// Movies whose minimum age is at most `age` (inclusive).
    fn list_by_max_age(&self, age: i64) -> GateResult<Vec<Movie>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|m| m.suitable_for(age))
            .collect())
    }

    /// Case-insensitive substring match on the title.
    fn search_by_title(&self, needle: &str) -> GateResult<Vec<Movie>> {
        let needle = needle.to_lowercase();
        Ok(self
            .list()?
            .into_iter()
            .filter(|m| m.title_contains(&needle))
            .collect())
    }

    fn list_by_genre(&self, genre: &str) -> GateResult<Vec<Movie>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|m| m.in_genre(genre))
            .collect())
    }

    fn create(&self, draft: MovieDraft) -> GateResult<Movie>;

    /// Replaces every mutable field. Fails with `NotFound` for unknown ids.
    fn update(&self, id: MovieId, draft: MovieDraft) -> GateResult<Movie>;

    /// Returns whether a movie was removed. Missing ids are not an error.
    fn delete(&self, id: MovieId) -> GateResult<bool>;
}
