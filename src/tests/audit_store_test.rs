// Audit trail storage and hash-chain verification.

use crate::audit_store::AuditStore;
use crate::audit_store_sled::SledAuditStore;
use crate::audit_verifier::verify_chain;
use crate::decision::{DecisionId, DenialReason, NewAccessDecision};
use crate::errors::GateError;
use crate::identity::UserId;
use crate::memory_store::MemoryAuditStore;
use crate::movie::MovieId;

use tempfile::tempdir;

fn append_sample(store: &dyn AuditStore) {
    store
        .append(NewAccessDecision::granted(MovieId(1), 30).with_user(Some(UserId(7))))
        .unwrap();
    store
        .append(NewAccessDecision::denied(MovieId(2), 15, DenialReason::AgeRestriction))
        .unwrap();
    store
        .append(NewAccessDecision::granted(MovieId(2), 18).with_user(Some(UserId(7))))
        .unwrap();
}

fn check_queries(store: &dyn AuditStore) {
    append_sample(store);

    assert_eq!(store.list().unwrap().len(), 3);
    assert_eq!(store.find_by_user(UserId(7)).unwrap().len(), 2);
    assert!(store.find_by_user(UserId(8)).unwrap().is_empty());
    assert_eq!(store.find_by_movie(MovieId(2)).unwrap().len(), 2);

    let denied = store.find_by_outcome(false).unwrap();
    assert_eq!(denied.len(), 1);
    assert_eq!(denied[0].denial_reason, Some(DenialReason::AgeRestriction));
    assert_eq!(denied[0].detected_age, 15);

    let granted = store.find_by_outcome(true).unwrap();
    assert!(granted.iter().all(|d| d.denial_reason.is_none()));
}

fn check_store_assigned_fields(store: &dyn AuditStore) {
    append_sample(store);
    let records = store.list().unwrap();
    let ids: Vec<DecisionId> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![DecisionId(1), DecisionId(2), DecisionId(3)]);
    assert!(records.windows(2).all(|w| w[0].accessed_at <= w[1].accessed_at));
    assert_eq!(records[0].prev_hash, None);
    assert_eq!(records[1].prev_hash.as_deref(), Some(records[0].hash.as_str()));
}

#[test]
fn memory_audit_queries() {
    check_queries(&MemoryAuditStore::new());
}

#[test]
fn sled_audit_queries() {
    let dir = tempdir().expect("failed to create temp dir");
    let store = SledAuditStore::new(dir.path().to_str().unwrap()).expect("open failed");
    check_queries(&store);
}

#[test]
fn memory_assigns_ids_timestamps_and_links() {
    check_store_assigned_fields(&MemoryAuditStore::new());
}

#[test]
fn sled_assigns_ids_timestamps_and_links() {
    let dir = tempdir().expect("failed to create temp dir");
    let store = SledAuditStore::new(dir.path().to_str().unwrap()).expect("open failed");
    check_store_assigned_fields(&store);
}

#[test]
fn empty_trail_verifies() {
    let report = verify_chain(&MemoryAuditStore::new()).unwrap();
    assert_eq!(report.records, 0);
    assert_eq!(report.head_hash, None);
}

#[test]
fn sled_chain_verifies_across_reopen() {
    let dir = tempdir().expect("failed to create temp dir");
    let path = dir.path().to_str().unwrap().to_string();
    {
        let store = SledAuditStore::new(&path).expect("open failed");
        append_sample(&store);
    }
    let store = SledAuditStore::new(&path).expect("reopen failed");
    store
        .append(NewAccessDecision::denied(MovieId(3), 4, DenialReason::AgeRestriction))
        .unwrap();

    let report = verify_chain(&store).expect("chain should verify");
    assert_eq!(report.records, 4);
    assert_eq!(report.head_hash, store.list().unwrap().last().map(|r| r.hash.clone()));
}

#[test]
fn tampered_record_breaks_the_chain() {
    let dir = tempdir().expect("failed to create temp dir");
    let path = dir.path().to_str().unwrap().to_string();
    {
        let store = SledAuditStore::new(&path).expect("open failed");
        append_sample(&store);
    }

    // Rewrite decision 2 as granted behind the store's back.
    {
        let db = sled::open(&path).unwrap();
        let tree = db.open_tree("access_decisions").unwrap();
        let key = 2u64.to_be_bytes();
        let mut record: crate::decision::AccessDecision =
            serde_json::from_slice(&tree.get(key).unwrap().unwrap()).unwrap();
        record.access_granted = true;
        record.denial_reason = None;
        tree.insert(key, serde_json::to_vec(&record).unwrap()).unwrap();
        tree.flush().unwrap();
    }

    let store = SledAuditStore::new(&path).expect("reopen failed");
    match verify_chain(&store) {
        Err(GateError::AuditChain { decision_id, .. }) => assert_eq!(decision_id, 2),
        other => panic!("expected broken chain, got {other:?}"),
    }
}
