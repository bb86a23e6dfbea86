//! # Charter Audit Ledger
//!
//! Append-only, hash-chained storage for moderation evaluation records.
//!
//! ## Purpose
//!
//! Every moderation run produces exactly one record, and analytics and
//! reviewers later rely on that history being complete and unedited. The
//! ledger gives two guarantees:
//!
//! 1. **Append-only** - entries are written once into an empty slot and never
//!    replaced.
//! 2. **Tamper-evident** - each entry's SHA-256 hash covers the previous
//!    entry's hash, so an edit or deletion anywhere breaks
//!    [`Ledger::verify_chain`] from that point on.
//!
//! ## Threat Model
//!
//! | Threat | Defense |
//! |--------|---------|
//! | Edited decision | Hash mismatch on that entry |
//! | Deleted entry (not the last) | Sequence gap on the next entry |
//! | Reordered entries | `prevHash` mismatch |
//! | Concurrent writers forking the chain | In-process append lock + CAS |
//!
//! Not covered:
//!
//! - Tail truncation. Deleting the newest entries leaves a shorter chain that
//!   still verifies as intact.
//! - An attacker who rewrites the entire chain from the tampered entry onward.
//!
//! Both are caught by anchoring [`Ledger::head`] somewhere external and
//! comparing it with the stored head.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌────────────┐   ┌────────────┐
//! │ seq 0      │   │ seq 1      │   │ seq 2      │
//! │ prev: 0x00 │◄──│ prev: h0   │◄──│ prev: h1   │
//! │ hash: h0   │   │ hash: h1   │   │ hash: h2   │  ◄── head
//! └────────────┘   └────────────┘   └────────────┘
//!         h_n = SHA-256(h_{n-1} ‖ n as u64 BE ‖ payload)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use charter_ledger::{ChainVerification, Ledger};
//! use serde_json::json;
//!
//! let ledger = Ledger::temporary().unwrap();
//! ledger.append(&json!({"finalDecision": "reject"})).unwrap();
//! ledger.append(&json!({"finalDecision": "approve"})).unwrap();
//!
//! assert_eq!(ledger.verify_chain().unwrap(), ChainVerification::Intact { len: 2 });
//! ```

pub mod chain;
pub mod models;
pub mod storage;

pub use chain::entry_hash;
pub use models::{
    to_hex, ChainVerification, Hash, LedgerEntry, LedgerError, LedgerReceipt, Result, GENESIS_HASH,
    HASH_SIZE,
};
pub use storage::Ledger;
