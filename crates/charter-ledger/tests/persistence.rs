//! On-disk behaviour of the ledger.

use charter_ledger::{ChainVerification, Ledger, LedgerEntry};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Record {
    final_decision: String,
    alignment_score: Option<f64>,
}

fn record(decision: &str, score: Option<f64>) -> Record {
    Record {
        final_decision: decision.to_string(),
        alignment_score: score,
    }
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_entries_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger");

    {
        let ledger = Ledger::open(&path).unwrap();
        ledger.append(&record("reject", None)).unwrap();
        ledger.append(&record("approve", Some(0.85))).unwrap();
        ledger.flush().unwrap();
    }

    let ledger = Ledger::open(&path).unwrap();
    assert_eq!(ledger.len(), 2);
    let decoded: Vec<Record> = ledger
        .entries()
        .unwrap()
        .iter()
        .map(|e| e.decode().unwrap())
        .collect();
    assert_eq!(decoded, vec![record("reject", None), record("approve", Some(0.85))]);
}

#[test]
fn test_chain_continues_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger");

    let first_head = {
        let ledger = Ledger::open(&path).unwrap();
        ledger.append(&record("flag", Some(0.55))).unwrap()
    };

    let ledger = Ledger::open(&path).unwrap();
    let second = ledger.append(&record("approve", Some(0.9))).unwrap();
    assert_eq!(second.seq, first_head.seq + 1);
    assert_eq!(ledger.get(1).unwrap().unwrap().prev_hash, first_head.hash_hex());
    assert_eq!(ledger.verify_chain().unwrap(), ChainVerification::Intact { len: 2 });
}

// ============================================================================
// Tamper detection
// ============================================================================

#[test]
fn test_offline_edit_is_detected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger");

    {
        let ledger = Ledger::open(&path).unwrap();
        ledger.append(&record("reject", None)).unwrap();
        ledger.append(&record("flag", Some(0.41))).unwrap();
        ledger.append(&record("approve", Some(0.7))).unwrap();
        ledger.flush().unwrap();
    }

    // Flip the middle decision directly in the database.
    {
        let db = sled::open(&path).unwrap();
        let tree = db.open_tree("entries").unwrap();
        let raw = tree.get(1u64.to_be_bytes()).unwrap().unwrap();
        let mut entry: LedgerEntry = serde_json::from_slice(&raw).unwrap();
        entry.payload = serde_json::to_string(&record("approve", Some(0.41))).unwrap();
        tree.insert(1u64.to_be_bytes(), serde_json::to_vec(&entry).unwrap())
            .unwrap();
        db.flush().unwrap();
    }

    let ledger = Ledger::open(&path).unwrap();
    match ledger.verify_chain().unwrap() {
        ChainVerification::Broken { seq, reason } => {
            assert_eq!(seq, 1);
            assert!(reason.contains("hash"));
        }
        other => panic!("expected a broken chain, got {:?}", other),
    }
}

#[test]
fn test_recomputed_entry_still_breaks_successor() {
    let ledger = Ledger::temporary().unwrap();
    ledger.append(&record("reject", None)).unwrap();
    ledger.append(&record("flag", Some(0.5))).unwrap();

    // Rewriting entry 0 consistently still orphans entry 1.
    let tampered = Ledger::temporary().unwrap();
    tampered.append(&record("approve", Some(0.99))).unwrap();
    let forged = tampered.get(0).unwrap().unwrap();
    let original_next = ledger.get(1).unwrap().unwrap();

    assert_ne!(forged.hash, ledger.get(0).unwrap().unwrap().hash);
    assert_ne!(original_next.prev_hash, forged.hash);
}
