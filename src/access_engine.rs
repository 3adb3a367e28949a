//! access_engine.rs
//! Decides whether a viewer of a given (externally detected) age may watch a
//! title, and records every decision in the audit trail.

use std::sync::Arc;
use tracing::{info, warn};

use crate::audit_store::AuditStore;
use crate::catalog_store::CatalogStore;
use crate::decision::{
    denied_message, AccessResult, DenialReason, NewAccessDecision, GRANTED_MESSAGE,
};
use crate::errors::{GateError, GateResult};
use crate::identity::{IdentityLookup, UserAttachment, UserId};
use crate::movie::MovieId;

/// Outcome of the age rule alone, before anything is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeVerdict {
    Allow,
    Deny,
}

/// Inclusive comparison: a detected age equal to the minimum grants access.
pub fn evaluate_age(detected_age: i32, min_age: u32) -> AgeVerdict {
    if i64::from(detected_age) >= i64::from(min_age) {
        AgeVerdict::Allow
    } else {
        AgeVerdict::Deny
    }
}

/// Stateless decision engine. Cloning shares the underlying stores.
#[derive(Clone)]
pub struct AccessEngine {
    catalog: Arc<dyn CatalogStore>,
    audit: Arc<dyn AuditStore>,
    identity: Arc<dyn IdentityLookup>,
}

impl AccessEngine {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        audit: Arc<dyn AuditStore>,
        identity: Arc<dyn IdentityLookup>,
    ) -> Self {
        Self {
            catalog,
            audit,
            identity,
        }
    }

    /// Checks access and appends exactly one audit record, unless the movie
    /// does not exist, in which case nothing is written.
    ///
    /// A movie without a minimum age fails closed: the attempt is recorded as
    /// denied and `GateError::MissingAgeRating` is returned.
    pub fn check_access(
        &self,
        movie_id: MovieId,
        detected_age: i32,
        user_id: Option<UserId>,
    ) -> GateResult<AccessResult> {
        let movie = self.catalog.get(movie_id)?;

        let attachment = UserAttachment::resolve(self.identity.as_ref(), user_id)?;
        if let UserAttachment::Unresolved(unknown) = &attachment {
            warn!(
                user_id = %unknown,
                movie_id = %movie_id,
                "user id did not resolve; recording anonymous access decision"
            );
        }

        let Some(min_age) = movie.min_age else {
            let record = self.audit.append(
                NewAccessDecision::denied(movie_id, detected_age, DenialReason::MissingAgeRating)
                    .with_user(attachment.recorded_id()),
            )?;
            warn!(
                movie_id = %movie_id,
                decision_id = %record.id,
                "movie has no minimum age rating; access denied"
            );
            return Err(GateError::MissingAgeRating { movie_id: movie_id.0 });
        };

        let (decision, message) = match evaluate_age(detected_age, min_age) {
            AgeVerdict::Allow => (
                NewAccessDecision::granted(movie_id, detected_age),
                GRANTED_MESSAGE.to_string(),
            ),
            AgeVerdict::Deny => (
                NewAccessDecision::denied(movie_id, detected_age, DenialReason::AgeRestriction),
                denied_message(min_age, detected_age),
            ),
        };

        let record = self
            .audit
            .append(decision.with_user(attachment.recorded_id()))?;

        info!(
            decision_id = %record.id,
            trace_id = %record.trace_id,
            movie_id = %movie_id,
            detected_age,
            min_age,
            granted = record.access_granted,
            "access decision recorded"
        );

        Ok(AccessResult {
            access_granted: record.access_granted,
            message,
            movie,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_rule_is_inclusive() {
        assert_eq!(evaluate_age(18, 18), AgeVerdict::Allow);
        assert_eq!(evaluate_age(17, 18), AgeVerdict::Deny);
        assert_eq!(evaluate_age(0, 0), AgeVerdict::Allow);
    }

    #[test]
    fn implausible_ages_are_compared_verbatim() {
        assert_eq!(evaluate_age(-3, 0), AgeVerdict::Deny);
        assert_eq!(evaluate_age(i32::MAX, u32::MAX), AgeVerdict::Deny);
        assert_eq!(evaluate_age(i32::MAX, 21), AgeVerdict::Allow);
    }
}
