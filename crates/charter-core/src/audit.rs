//! Audit sinks for evaluation records.

use std::sync::Mutex;

use charter_ledger::Ledger;
use tracing::debug;

use crate::record::EvaluationRecord;
use crate::Result;

/// Append-only destination for evaluation records.
pub trait AuditSink: Send + Sync {
    /// Returns the name of this sink, for logs.
    fn name(&self) -> &str;

    /// Appends one record. Implementations must never replace an earlier one.
    fn append(&self, record: &EvaluationRecord) -> Result<()>;
}

/// Appends records to a hash-chained [`Ledger`].
#[derive(Debug, Clone)]
pub struct LedgerAuditSink {
    ledger: Ledger,
}

impl LedgerAuditSink {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

impl AuditSink for LedgerAuditSink {
    fn name(&self) -> &str {
        "ledger"
    }

    fn append(&self, record: &EvaluationRecord) -> Result<()> {
        let receipt = self.ledger.append(record)?;
        debug!(record = %record.id(), seq = receipt.seq, "Evaluation record appended to ledger");
        Ok(())
    }
}

/// Keeps records in memory. Useful for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: Mutex<Vec<EvaluationRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far.
    pub fn records(&self) -> Vec<EvaluationRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<EvaluationRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AuditSink for MemoryAuditSink {
    fn name(&self) -> &str {
        "memory"
    }

    fn append(&self, record: &EvaluationRecord) -> Result<()> {
        self.lock().push(record.clone());
        Ok(())
    }
}
