//! # Ledger Data Models
//!
//! Entry, receipt and verification types, plus the ledger error enum.
//!
//! ## Entry Layout
//!
//! | Field | Type | Notes |
//! |-------|------|-------|
//! | `seq` | u64 | 0-based, contiguous |
//! | `prevHash` | hex | hash of entry `seq - 1`, zeros for the first entry |
//! | `hash` | hex | `SHA-256(prevHash ‖ seq_be ‖ payload)` |
//! | `recordedAt` | RFC 3339 | wall-clock time of the append |
//! | `payload` | string | the appended value as JSON text |
//!
//! The payload is kept as the exact JSON text that was hashed, so
//! verification never depends on re-serializing a parsed value.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// SHA-256 output size in bytes.
pub const HASH_SIZE: usize = 32;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; HASH_SIZE];

/// Previous-hash value of the first entry.
pub const GENESIS_HASH: Hash = [0u8; HASH_SIZE];

/// Lowercase hex encoding of a digest.
pub fn to_hex(hash: &Hash) -> String {
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Parses a 64-character hex digest.
pub fn from_hex(text: &str) -> Option<Hash> {
    if text.len() != HASH_SIZE * 2 || !text.is_ascii() {
        return None;
    }
    let mut hash = [0u8; HASH_SIZE];
    for (i, byte) in hash.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&text[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(hash)
}

/// One stored ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub seq: u64,
    pub prev_hash: String,
    pub hash: String,
    pub recorded_at: DateTime<Utc>,
    pub payload: String,
}

impl LedgerEntry {
    /// Decodes the payload into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

/// Returned by a successful append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerReceipt {
    pub seq: u64,
    pub hash: Hash,
}

impl LedgerReceipt {
    pub fn hash_hex(&self) -> String {
        to_hex(&self.hash)
    }
}

/// Outcome of walking the whole chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainVerification {
    /// Every entry links to its predecessor and hashes correctly.
    Intact {
        /// Number of entries checked.
        len: u64,
    },

    /// The first entry that failed verification.
    Broken {
        seq: u64,
        reason: String,
    },
}

impl ChainVerification {
    pub fn is_intact(&self) -> bool {
        matches!(self, ChainVerification::Intact { .. })
    }
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Payload could not be serialized or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored entry is unreadable.
    #[error("Corrupted ledger entry {seq}: {reason}")]
    Corrupted { seq: u64, reason: String },

    /// The target sequence slot was already taken.
    #[error("Ledger slot {seq} already written")]
    Conflict { seq: u64 },
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
