use crate::decision::{AccessDecision, NewAccessDecision};
use crate::errors::GateResult;
use crate::identity::UserId;
use crate::movie::MovieId;

/// Append-only storage of access decisions.
///
/// Implementations assign the id, the timestamp and the hash link at append
/// time; nothing supplied by the caller overrides them. No update or delete
/// is exposed.
pub trait AuditStore: Send + Sync {
    fn append(&self, decision: NewAccessDecision) -> GateResult<AccessDecision>;

    /// Every record in append order.
    fn list(&self) -> GateResult<Vec<AccessDecision>>;

    fn find_by_user(&self, user_id: UserId) -> GateResult<Vec<AccessDecision>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|d| d.user_id == Some(user_id))
            .collect())
    }

    fn find_by_movie(&self, movie_id: MovieId) -> GateResult<Vec<AccessDecision>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|d| d.movie_id == movie_id)
            .collect())
    }

    fn find_by_outcome(&self, granted: bool) -> GateResult<Vec<AccessDecision>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|d| d.access_granted == granted)
            .collect())
    }
}
