use sled::Db;

use crate::catalog_store::CatalogStore;
use crate::errors::{GateError, GateResult};
use crate::movie::{Movie, MovieDraft, MovieId};
use crate::sequence::next_id;

const MOVIES_TREE: &str = "movies";

/// A sled-backed implementation of CatalogStore. Movies live in the `movies`
/// tree under big-endian ids, so iteration order is id order.
pub struct SledCatalogStore {
    db: Db,
    tree: sled::Tree,
}

impl SledCatalogStore {
    /// Opens (or creates) a sled database at `path`.
    pub fn new(path: &str) -> GateResult<Self> {
        let db = sled::open(path)
            .map_err(|e| GateError::store(format!("open sled db at {path}"), e))?;
        Self::with_db(&db)
    }

    /// Shares an already opened database, e.g. with the audit store.
    pub fn with_db(db: &Db) -> GateResult<Self> {
        let tree = db
            .open_tree(MOVIES_TREE)
            .map_err(|e| GateError::store("open movies tree", e))?;
        Ok(Self {
            db: db.clone(),
            tree,
        })
    }

    fn serialize_movie(movie: &Movie) -> GateResult<Vec<u8>> {
        serde_json::to_vec(movie)
            .map_err(|e| GateError::serialization(format!("encode movie {}", movie.id), e))
    }

    fn deserialize_movie(bytes: &[u8]) -> GateResult<Movie> {
        serde_json::from_slice(bytes).map_err(|e| GateError::serialization("decode movie", e))
    }

    fn put(&self, movie: &Movie) -> GateResult<()> {
        let data = Self::serialize_movie(movie)?;
        self.tree.insert(movie.id.0.to_be_bytes(), data)?;
        self.tree.flush()?;
        Ok(())
    }
}

impl CatalogStore for SledCatalogStore {
    fn get(&self, id: MovieId) -> GateResult<Movie> {
        match self.tree.get(id.0.to_be_bytes())? {
            Some(bytes) => Self::deserialize_movie(&bytes),
            None => Err(GateError::not_found("movie", id)),
        }
    }

    fn list(&self) -> GateResult<Vec<Movie>> {
        self.tree
            .iter()
            .values()
            .map(|value| Self::deserialize_movie(&value?))
            .collect()
    }

    fn create(&self, draft: MovieDraft) -> GateResult<Movie> {
        draft.validate()?;
        let id = MovieId(next_id(&self.db, MOVIES_TREE)?);
        let movie = draft.into_movie(id);
        self.put(&movie)?;
        tracing::info!(movie_id = %id, title = %movie.title, "movie created");
        Ok(movie)
    }

    fn update(&self, id: MovieId, draft: MovieDraft) -> GateResult<Movie> {
        draft.validate()?;
        let movie = draft.into_movie(id);
        let data = Self::serialize_movie(&movie)?;
        // Only replaces an existing value, so a concurrent delete is not undone.
        let previous = self
            .tree
            .fetch_and_update(id.0.to_be_bytes(), |old| old.map(|_| data.clone()))?;
        if previous.is_none() {
            return Err(GateError::not_found("movie", id));
        }
        self.tree.flush()?;
        tracing::info!(movie_id = %id, "movie updated");
        Ok(movie)
    }

    fn delete(&self, id: MovieId) -> GateResult<bool> {
        let removed = self.tree.remove(id.0.to_be_bytes())?.is_some();
        if removed {
            self.tree.flush()?;
            tracing::info!(movie_id = %id, "movie deleted");
        }
        Ok(removed)
    }
}
