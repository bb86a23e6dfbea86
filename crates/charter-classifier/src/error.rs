//! Error types for the semantic classifier.
//!
//! The orchestrator decides whether to retry from the variant alone, so each
//! failure class gets its own variant rather than a shared message string.

use thiserror::Error;

use crate::models::Decision;

/// Errors that can occur while classifying content.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassifierError {
    /// The provider could not be reached, timed out, or is overloaded.
    ///
    /// Retryable with backoff.
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    /// The response was not the documented JSON shape.
    ///
    /// Covers non-JSON bodies, missing or mistyped fields, and out-of-range
    /// scores. Not retryable for the same input.
    #[error("Classifier response invalid: {0}")]
    ResponseInvalid(String),

    /// The stated decision contradicts the band implied by the score.
    #[error(
        "Contract violation: alignment score {score:.2} implies '{expected}' but response stated '{stated}'"
    )]
    ContractViolation {
        /// The alignment score as returned.
        score: f64,
        /// The decision the response stated.
        stated: Decision,
        /// The decision implied by the score band.
        expected: Decision,
    },

    /// The provider refused the request (bad credentials, bad request).
    #[error("Provider rejected request with HTTP {status}: {message}")]
    ProviderRejected {
        /// HTTP status code.
        status: u16,
        /// Provider error body, truncated.
        message: String,
    },

    /// The classifier could not be constructed.
    #[error("Classifier configuration error: {0}")]
    Configuration(String),
}

impl ClassifierError {
    /// Returns true if the same request may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClassifierError::Unavailable(_))
    }

    /// Stable short name, used in logs and pending records.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifierError::Unavailable(_) => "unavailable",
            ClassifierError::ResponseInvalid(_) => "invalid_response",
            ClassifierError::ContractViolation { .. } => "contract_violation",
            ClassifierError::ProviderRejected { .. } => "provider_rejected",
            ClassifierError::Configuration(_) => "configuration",
        }
    }
}
