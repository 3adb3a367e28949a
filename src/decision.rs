//! Access decision records and the result handed back to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

use crate::identity::UserId;
use crate::movie::{Movie, MovieId};

pub const GRANTED_MESSAGE: &str = "Access granted. Enjoy the movie!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionId(pub u64);

impl fmt::Display for DecisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a check was denied. Stored as its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DenialReason {
    #[serde(rename = "Age restriction")]
    AgeRestriction,
    #[serde(rename = "Missing age rating")]
    MissingAgeRating,
}

impl DenialReason {
    pub fn label(&self) -> &'static str {
        match self {
            DenialReason::AgeRestriction => "Age restriction",
            DenialReason::MissingAgeRating => "Missing age rating",
        }
    }
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A decision before the audit store has assigned id, timestamp and hash link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccessDecision {
    pub trace_id: Uuid,
    pub user_id: Option<UserId>,
    pub movie_id: MovieId,
    pub detected_age: i32,
    pub access_granted: bool,
    pub denial_reason: Option<DenialReason>,
}

impl NewAccessDecision {
    pub fn granted(movie_id: MovieId, detected_age: i32) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            user_id: None,
            movie_id,
            detected_age,
            access_granted: true,
            denial_reason: None,
        }
    }

    pub fn denied(movie_id: MovieId, detected_age: i32, reason: DenialReason) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            user_id: None,
            movie_id,
            detected_age,
            access_granted: false,
            denial_reason: Some(reason),
        }
    }

    pub fn with_user(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Seals the decision with store-assigned fields and links it to `prev_hash`.
    pub fn seal(
        self,
        id: DecisionId,
        accessed_at: DateTime<Utc>,
        prev_hash: Option<String>,
    ) -> AccessDecision {
        let mut record = AccessDecision {
            id,
            trace_id: self.trace_id,
            user_id: self.user_id,
            movie_id: self.movie_id,
            detected_age: self.detected_age,
            access_granted: self.access_granted,
            denial_reason: self.denial_reason,
            accessed_at,
            prev_hash,
            hash: String::new(),
        };
        record.hash = record.compute_hash();
        record
    }
}

/// Immutable audit record of one access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    pub id: DecisionId,
    pub trace_id: Uuid,
    pub user_id: Option<UserId>,
    pub movie_id: MovieId,
    pub detected_age: i32,
    pub access_granted: bool,
    pub denial_reason: Option<DenialReason>,
    pub accessed_at: DateTime<Utc>,
    pub prev_hash: Option<String>,
    pub hash: String,
}

impl AccessDecision {
    /// SHA-256 over the previous hash and every other field of this record.
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        if let Some(prev) = &self.prev_hash {
            hasher.update(prev.as_bytes());
        }
        let body = format!(
            "{}|{}|{}|{}|{}|{}|{}|{}",
            self.id,
            self.trace_id,
            self.user_id.map(|u| u.to_string()).unwrap_or_default(),
            self.movie_id,
            self.detected_age,
            self.access_granted,
            self.denial_reason.map(|r| r.label()).unwrap_or_default(),
            self.accessed_at.to_rfc3339(),
        );
        hasher.update(body.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// What a caller learns from an access check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessResult {
    pub access_granted: bool,
    pub message: String,
    pub movie: Movie,
}

pub fn denied_message(min_age: u32, detected_age: i32) -> String {
    format!(
        "Access denied. This content requires minimum age {min_age}, detected age: {detected_age}"
    )
}
