//! Error types for Charter Core.

use thiserror::Error;

use crate::record::EvaluationRecord;

/// Core error type for moderation runs.
///
/// Classifier failures are not here: they end in a pending record, not an
/// error. What remains is bootstrap trouble, cancellation and audit failures.
#[derive(Debug, Error)]
pub enum CharterError {
    /// The caller cancelled the run before a record was produced.
    #[error("Evaluation cancelled")]
    Cancelled,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Pattern catalog failed to build.
    #[error("Catalog error: {0}")]
    Catalog(#[from] charter_patterns::CatalogError),

    /// Classifier could not be constructed.
    #[error("Classifier error: {0}")]
    Classifier(#[from] charter_classifier::ClassifierError),

    /// Audit sink error passthrough.
    #[error("Audit error: {0}")]
    Audit(#[from] charter_ledger::LedgerError),

    /// The record was produced but the audit sink refused it.
    #[error("Evaluation record {} was not recorded: {reason}", record.id())]
    NotRecorded {
        /// The record that could not be appended.
        record: Box<EvaluationRecord>,
        /// Why the sink refused it.
        reason: String,
    },
}
