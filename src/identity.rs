//! Minimal view of the user-identity subsystem.
//!
//! Access checks only need to know whether a supplied user id exists; accounts
//! themselves are managed elsewhere. `SledUserDirectory` is a small durable
//! directory so the service can run standalone.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{GateError, GateResult};
use crate::sequence::next_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

pub trait IdentityLookup: Send + Sync {
    fn find_user(&self, id: UserId) -> GateResult<Option<User>>;
}

/// Outcome of attaching an optional caller-supplied user to an audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAttachment {
    Anonymous,
    Resolved(User),
    /// The id was supplied but no such user exists. Recorded as anonymous.
    Unresolved(UserId),
}

impl UserAttachment {
    pub fn resolve(lookup: &dyn IdentityLookup, user_id: Option<UserId>) -> GateResult<Self> {
        let Some(id) = user_id else {
            return Ok(UserAttachment::Anonymous);
        };
        Ok(match lookup.find_user(id)? {
            Some(user) => UserAttachment::Resolved(user),
            None => UserAttachment::Unresolved(id),
        })
    }

    /// The user id that may be written to the audit trail.
    pub fn recorded_id(&self) -> Option<UserId> {
        match self {
            UserAttachment::Resolved(user) => Some(user.id),
            UserAttachment::Anonymous | UserAttachment::Unresolved(_) => None,
        }
    }
}

/// sled-backed user directory, tree `users`.
pub struct SledUserDirectory {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledUserDirectory {
    pub fn open(db: &sled::Db) -> GateResult<Self> {
        let tree = db
            .open_tree("users")
            .map_err(|e| GateError::store("open users tree", e))?;
        Ok(Self {
            db: db.clone(),
            tree,
        })
    }

    pub fn register(&self, username: &str) -> GateResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(GateError::validation("username", "must not be empty"));
        }
        let id = UserId(next_id(&self.db, "users")?);
        let user = User {
            id,
            username: username.to_string(),
        };
        self.tree
            .insert(id.0.to_be_bytes(), serde_json::to_vec(&user)?)?;
        self.tree.flush()?;
        tracing::info!(user_id = %id, "registered user");
        Ok(user)
    }
}

impl IdentityLookup for SledUserDirectory {
    fn find_user(&self, id: UserId) -> GateResult<Option<User>> {
        match self.tree.get(id.0.to_be_bytes())? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| GateError::serialization(format!("decode user {id}"), e)),
            None => Ok(None),
        }
    }
}
