use chrono::Utc;
use sled::Db;
use std::sync::Mutex;

use crate::audit_store::AuditStore;
use crate::decision::{AccessDecision, DecisionId, NewAccessDecision};
use crate::errors::{GateError, GateResult};
use crate::sequence::next_id;

const DECISIONS_TREE: &str = "access_decisions";

/// sled-backed audit trail. Records are keyed by big-endian decision id and
/// each one carries the hash of its predecessor.
pub struct SledAuditStore {
    db: Db,
    tree: sled::Tree,
    /// Serializes appends so the hash chain stays linear.
    append_lock: Mutex<()>,
}

impl SledAuditStore {
    pub fn new(path: &str) -> GateResult<Self> {
        let db = sled::open(path)
            .map_err(|e| GateError::store(format!("open sled db at {path}"), e))?;
        Self::with_db(&db)
    }

    pub fn with_db(db: &Db) -> GateResult<Self> {
        let tree = db
            .open_tree(DECISIONS_TREE)
            .map_err(|e| GateError::store("open access_decisions tree", e))?;
        Ok(Self {
            db: db.clone(),
            tree,
            append_lock: Mutex::new(()),
        })
    }

    fn decode(bytes: &[u8]) -> GateResult<AccessDecision> {
        serde_json::from_slice(bytes)
            .map_err(|e| GateError::serialization("decode access decision", e))
    }

    /// Hash of the most recent record, if any.
    fn last_hash(&self) -> GateResult<Option<String>> {
        match self.tree.last()? {
            Some((_, bytes)) => Ok(Some(Self::decode(&bytes)?.hash)),
            None => Ok(None),
        }
    }
}

impl AuditStore for SledAuditStore {
    fn append(&self, decision: NewAccessDecision) -> GateResult<AccessDecision> {
        let _guard = self
            .append_lock
            .lock()
            .map_err(|_| GateError::poisoned("audit append lock"))?;

        let prev_hash = self.last_hash()?;
        let id = DecisionId(next_id(&self.db, DECISIONS_TREE)?);
        let record = decision.seal(id, Utc::now(), prev_hash);

        let data = serde_json::to_vec(&record)
            .map_err(|e| GateError::serialization(format!("encode access decision {id}"), e))?;
        self.tree.insert(id.0.to_be_bytes(), data)?;
        self.tree.flush()?;

        tracing::debug!(decision_id = %id, hash = %record.hash, "access decision appended");
        Ok(record)
    }

    fn list(&self) -> GateResult<Vec<AccessDecision>> {
        self.tree
            .iter()
            .values()
            .map(|value| Self::decode(&value?))
            .collect()
    }
}
