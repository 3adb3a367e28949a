//! Per-entity id sequences kept in the `sequences` tree.

use crate::errors::{GateError, GateResult};

/// Atomically increments the counter `name` and returns the new value. The
/// first id handed out is 1.
pub fn next_id(db: &sled::Db, name: &str) -> GateResult<u64> {
    let sequences = db
        .open_tree("sequences")
        .map_err(|e| GateError::store("open sequences tree", e))?;
    let updated = sequences
        .update_and_fetch(name.as_bytes(), |current| {
            let next = current
                .and_then(|bytes| <[u8; 8]>::try_from(bytes).ok())
                .map(u64::from_be_bytes)
                .unwrap_or(0)
                + 1;
            Some(next.to_be_bytes().to_vec())
        })
        .map_err(|e| GateError::store(format!("advance sequence {name}"), e))?;

    updated
        .and_then(|bytes| <[u8; 8]>::try_from(&bytes[..]).ok())
        .map(u64::from_be_bytes)
        .ok_or_else(|| {
            GateError::store(
                format!("advance sequence {name}"),
                std::io::Error::new(std::io::ErrorKind::InvalidData, "sequence value is not a u64"),
            )
        })
}
