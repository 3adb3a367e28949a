//! In-process stores. Selected with `backend = "memory"` and used by the
//! engine and router tests; nothing survives a restart.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::audit_store::AuditStore;
use crate::catalog_store::CatalogStore;
use crate::decision::{AccessDecision, DecisionId, NewAccessDecision};
use crate::errors::{GateError, GateResult, SafeReadLock, SafeWriteLock};
use crate::identity::{IdentityLookup, User, UserId};
use crate::movie::{Movie, MovieDraft, MovieId};

#[derive(Default)]
struct CatalogState {
    next_id: u64,
    movies: BTreeMap<MovieId, Movie>,
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    state: RwLock<CatalogState>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a movie verbatim, bypassing draft validation. Lets tests and
    /// imports reproduce records written before ratings were enforced.
    pub fn insert_raw(&self, movie: Movie) -> GateResult<()> {
        let mut state = self.state.safe_write()?;
        state.next_id = state.next_id.max(movie.id.0);
        state.movies.insert(movie.id, movie);
        Ok(())
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn get(&self, id: MovieId) -> GateResult<Movie> {
        self.state
            .safe_read()?
            .movies
            .get(&id)
            .cloned()
            .ok_or_else(|| GateError::not_found("movie", id))
    }

    fn list(&self) -> GateResult<Vec<Movie>> {
        Ok(self.state.safe_read()?.movies.values().cloned().collect())
    }

    fn create(&self, draft: MovieDraft) -> GateResult<Movie> {
        draft.validate()?;
        let mut state = self.state.safe_write()?;
        state.next_id += 1;
        let movie = draft.into_movie(MovieId(state.next_id));
        state.movies.insert(movie.id, movie.clone());
        tracing::info!(movie_id = %movie.id, title = %movie.title, "movie created");
        Ok(movie)
    }

    fn update(&self, id: MovieId, draft: MovieDraft) -> GateResult<Movie> {
        draft.validate()?;
        let mut state = self.state.safe_write()?;
        let slot = state
            .movies
            .get_mut(&id)
            .ok_or_else(|| GateError::not_found("movie", id))?;
        *slot = draft.into_movie(id);
        tracing::info!(movie_id = %id, "movie updated");
        Ok(slot.clone())
    }

    fn delete(&self, id: MovieId) -> GateResult<bool> {
        let removed = self.state.safe_write()?.movies.remove(&id).is_some();
        if removed {
            tracing::info!(movie_id = %id, "movie deleted");
        }
        Ok(removed)
    }
}

#[derive(Default)]
pub struct MemoryAuditStore {
    records: RwLock<Vec<AccessDecision>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> GateResult<usize> {
        Ok(self.records.safe_read()?.len())
    }

    pub fn is_empty(&self) -> GateResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl AuditStore for MemoryAuditStore {
    fn append(&self, decision: NewAccessDecision) -> GateResult<AccessDecision> {
        let mut records = self.records.safe_write()?;
        let prev_hash = records.last().map(|r| r.hash.clone());
        let id = DecisionId(records.len() as u64 + 1);
        let record = decision.seal(id, Utc::now(), prev_hash);
        records.push(record.clone());
        Ok(record)
    }

    fn list(&self) -> GateResult<Vec<AccessDecision>> {
        Ok(self.records.safe_read()?.clone())
    }
}

#[derive(Default)]
pub struct MemoryUserDirectory {
    users: RwLock<BTreeMap<UserId, User>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) -> GateResult<()> {
        self.users.safe_write()?.insert(user.id, user);
        Ok(())
    }
}

impl IdentityLookup for MemoryUserDirectory {
    fn find_user(&self, id: UserId) -> GateResult<Option<User>> {
        Ok(self.users.safe_read()?.get(&id).cloned())
    }
}
