use serde::Serialize;

use crate::audit_store::AuditStore;
use crate::errors::{GateError, GateResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainReport {
    pub records: usize,
    pub head_hash: Option<String>,
}

/// Walks the audit trail in append order and recomputes every hash link.
/// Fails at the first record whose stored hash or predecessor link does not match.
pub fn verify_chain(store: &dyn AuditStore) -> GateResult<ChainReport> {
    let records = store.list()?;
    let mut previous: Option<String> = None;

    for record in &records {
        if record.prev_hash != previous {
            return Err(GateError::audit_chain(
                record.id.0,
                "link to previous record does not match",
            ));
        }
        if record.compute_hash() != record.hash {
            return Err(GateError::audit_chain(record.id.0, "record hash mismatch"));
        }
        previous = Some(record.hash.clone());
    }

    tracing::debug!(records = records.len(), "audit chain verified");
    Ok(ChainReport {
        records: records.len(),
        head_hash: previous,
    })
}
