//! # Persistent Ledger Storage
//!
//! Sled-backed append-only log. Every evaluation record lands here exactly
//! once and is never rewritten.
//!
//! ## Threat Model
//!
//! - **Silent edits**: each entry's hash covers its predecessor's hash, so
//!   changing any stored payload breaks every later link.
//! - **Overwrites**: appends use compare-and-swap against an empty slot; an
//!   occupied slot is a [`LedgerError::Conflict`], never a replacement.
//! - **Forks**: appends are serialized in-process, so the chain stays linear.
//!
//! ## Storage Structure
//!
//! | Tree | Key | Value |
//! |------|-----|-------|
//! | `entries` | big-endian u64 seq | JSON [`LedgerEntry`] |
//!
//! Big-endian keys make sled's lexicographic order equal to sequence order.
//!
//! ## References
//!
//! - Sled documentation: <https://sled.rs/>
//! - Certificate Transparency logs (RFC 6962) for the append-only idea

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::chain::{check_link, entry_hash};
use crate::models::{
    from_hex, to_hex, ChainVerification, Hash, LedgerEntry, LedgerError, LedgerReceipt, Result,
    GENESIS_HASH,
};

/// Tree holding ledger entries.
const ENTRY_TREE: &str = "entries";

/// Append-only, hash-chained ledger.
///
/// Cheap to clone; clones share the database and the append lock.
///
/// # Example
///
/// ```rust
/// use charter_ledger::Ledger;
/// use serde_json::json;
///
/// let ledger = Ledger::temporary().unwrap();
/// let receipt = ledger.append(&json!({"finalDecision": "approve"})).unwrap();
/// assert_eq!(receipt.seq, 0);
/// assert!(ledger.verify_chain().unwrap().is_intact());
/// ```
#[derive(Clone)]
pub struct Ledger {
    db: sled::Db,
    entries: sled::Tree,
    append_lock: Arc<Mutex<()>>,
}

impl Ledger {
    /// Opens or creates a ledger at the given directory.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Database` if the path is unusable or the
    /// database is locked by another process.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Creates an in-memory ledger that disappears on drop.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self> {
        let entries = db.open_tree(ENTRY_TREE)?;
        Ok(Ledger {
            db,
            entries,
            append_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Appends a value and returns its position and hash.
    ///
    /// # Errors
    ///
    /// - `Serialization` if the value cannot be encoded
    /// - `Corrupted` if the current head cannot be read
    /// - `Conflict` if the next slot is already occupied
    pub fn append<T: Serialize>(&self, value: &T) -> Result<LedgerReceipt> {
        let payload = serde_json::to_string(value)?;

        // A poisoned lock only means another append panicked; the tree is
        // still consistent because writes are single CAS operations.
        let _guard = self
            .append_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let (seq, prev) = match self.head()? {
            Some(head) => (head.seq + 1, head.hash),
            None => (0, GENESIS_HASH),
        };

        let hash = entry_hash(&prev, seq, payload.as_bytes());
        let entry = LedgerEntry {
            seq,
            prev_hash: to_hex(&prev),
            hash: to_hex(&hash),
            recorded_at: Utc::now(),
            payload,
        };
        let bytes = serde_json::to_vec(&entry)?;

        if self
            .entries
            .compare_and_swap(seq.to_be_bytes(), None as Option<&[u8]>, Some(bytes))?
            .is_err()
        {
            warn!(seq, "Ledger slot already occupied");
            return Err(LedgerError::Conflict { seq });
        }

        debug!(seq, hash = %entry.hash, "Ledger entry appended");
        Ok(LedgerReceipt { seq, hash })
    }

    /// Loads one entry by sequence number.
    pub fn get(&self, seq: u64) -> Result<Option<LedgerEntry>> {
        match self.entries.get(seq.to_be_bytes())? {
            Some(bytes) => Ok(Some(decode_entry(seq, &bytes)?)),
            None => Ok(None),
        }
    }

    /// Loads every entry in sequence order.
    pub fn entries(&self) -> Result<Vec<LedgerEntry>> {
        let mut out = Vec::with_capacity(self.entries.len());
        for item in self.entries.iter() {
            let (key, value) = item?;
            let seq = decode_key(&key)?;
            out.push(decode_entry(seq, &value)?);
        }
        Ok(out)
    }

    /// Position and hash of the newest entry.
    pub fn head(&self) -> Result<Option<LedgerReceipt>> {
        let Some((key, value)) = self.entries.last()? else {
            return Ok(None);
        };
        let seq = decode_key(&key)?;
        let entry = decode_entry(seq, &value)?;
        let hash = from_hex(&entry.hash).ok_or_else(|| LedgerError::Corrupted {
            seq,
            reason: "malformed hash".to_string(),
        })?;
        Ok(Some(LedgerReceipt { seq, hash }))
    }

    /// Walks the chain from the first entry and reports the first break.
    ///
    /// Unreadable entries count as breaks rather than errors, so an audit
    /// always gets an answer. Only database failures are returned as `Err`.
    pub fn verify_chain(&self) -> Result<ChainVerification> {
        let mut expected_prev: Hash = GENESIS_HASH;
        let mut expected_seq: u64 = 0;

        for item in self.entries.iter() {
            let (key, value) = item?;
            let entry: LedgerEntry = match serde_json::from_slice(&value) {
                Ok(entry) => entry,
                Err(e) => {
                    let seq = decode_key(&key).unwrap_or(expected_seq);
                    return Ok(ChainVerification::Broken {
                        seq,
                        reason: format!("unreadable entry: {}", e),
                    });
                }
            };

            if key[..] != entry.seq.to_be_bytes()[..] {
                return Ok(ChainVerification::Broken {
                    seq: entry.seq,
                    reason: "entry stored under a different key".to_string(),
                });
            }

            match check_link(&entry, expected_seq, &expected_prev) {
                Ok(hash) => {
                    expected_prev = hash;
                    expected_seq += 1;
                }
                Err(reason) => {
                    warn!(seq = entry.seq, %reason, "Ledger chain broken");
                    return Ok(ChainVerification::Broken {
                        seq: entry.seq,
                        reason,
                    });
                }
            }
        }

        Ok(ChainVerification::Intact { len: expected_seq })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flushes pending writes to disk and returns the bytes written.
    pub fn flush(&self) -> Result<usize> {
        Ok(self.db.flush()?)
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger").field("entries", &self.len()).finish()
    }
}

fn decode_key(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| LedgerError::Corrupted {
        seq: 0,
        reason: format!("key of {} bytes", key.len()),
    })?;
    Ok(u64::from_be_bytes(bytes))
}

fn decode_entry(seq: u64, bytes: &[u8]) -> Result<LedgerEntry> {
    serde_json::from_slice(bytes).map_err(|e| LedgerError::Corrupted {
        seq,
        reason: e.to_string(),
    })
}
