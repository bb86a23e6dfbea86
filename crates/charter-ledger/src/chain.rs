//! Hash chaining.

use sha2::{Digest, Sha256};

use crate::models::{from_hex, to_hex, Hash, LedgerEntry};

/// Computes `SHA-256(prev_hash ‖ seq_be ‖ payload)`.
pub fn entry_hash(prev_hash: &Hash, seq: u64, payload: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(prev_hash);
    hasher.update(seq.to_be_bytes());
    hasher.update(payload);
    hasher.finalize().into()
}

/// Checks one entry against the expected sequence number and predecessor.
///
/// Returns the entry's own hash on success, or the reason it failed.
pub fn check_link(entry: &LedgerEntry, expected_seq: u64, expected_prev: &Hash) -> Result<Hash, String> {
    if entry.seq != expected_seq {
        return Err(format!("expected seq {}, found {}", expected_seq, entry.seq));
    }

    let prev = from_hex(&entry.prev_hash).ok_or_else(|| "malformed prevHash".to_string())?;
    if &prev != expected_prev {
        return Err(format!(
            "prevHash {} does not match predecessor {}",
            entry.prev_hash,
            to_hex(expected_prev)
        ));
    }

    let stored = from_hex(&entry.hash).ok_or_else(|| "malformed hash".to_string())?;
    let computed = entry_hash(&prev, entry.seq, entry.payload.as_bytes());
    if stored != computed {
        return Err("hash does not match contents".to_string());
    }

    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GENESIS_HASH;
    use chrono::Utc;

    fn entry(seq: u64, prev: &Hash, payload: &str) -> LedgerEntry {
        LedgerEntry {
            seq,
            prev_hash: to_hex(prev),
            hash: to_hex(&entry_hash(prev, seq, payload.as_bytes())),
            recorded_at: Utc::now(),
            payload: payload.to_string(),
        }
    }

    #[test]
    fn test_hash_depends_on_every_input() {
        let base = entry_hash(&GENESIS_HASH, 0, b"a");
        assert_ne!(base, entry_hash(&GENESIS_HASH, 1, b"a"));
        assert_ne!(base, entry_hash(&GENESIS_HASH, 0, b"b"));
        assert_ne!(base, entry_hash(&[1u8; 32], 0, b"a"));
        assert_eq!(base, entry_hash(&GENESIS_HASH, 0, b"a"));
    }

    #[test]
    fn test_valid_link() {
        let e = entry(0, &GENESIS_HASH, r#"{"x":1}"#);
        let hash = check_link(&e, 0, &GENESIS_HASH).unwrap();
        assert_eq!(to_hex(&hash), e.hash);
    }

    #[test]
    fn test_edited_payload_is_detected() {
        let mut e = entry(0, &GENESIS_HASH, r#"{"decision":"reject"}"#);
        e.payload = r#"{"decision":"approve"}"#.to_string();
        assert!(check_link(&e, 0, &GENESIS_HASH).is_err());
    }

    #[test]
    fn test_wrong_predecessor_is_detected() {
        let e = entry(1, &[7u8; 32], "{}");
        let err = check_link(&e, 1, &[8u8; 32]).unwrap_err();
        assert!(err.contains("prevHash"));
    }

    #[test]
    fn test_gap_is_detected() {
        let e = entry(2, &GENESIS_HASH, "{}");
        assert!(check_link(&e, 1, &GENESIS_HASH).is_err());
    }
}
