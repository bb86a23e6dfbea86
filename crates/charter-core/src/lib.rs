//! # Charter Core
//!
//! Constitutional content moderation for community problem reports, proposed
//! solutions and debate posts. Sequences the deterministic pattern layer and
//! the semantic classifier into one immutable, audited evaluation record.
//!
//! ## Layers
//!
//! | Layer | Crate | Role |
//! |-------|-------|------|
//! | A | `charter-patterns` | Regex catalog of 12 forbidden concepts, <10ms, never fails |
//! | B | `charter-classifier` | Few-shot LLM judgment with strict validation |
//! | C | external | Human review of flagged records |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         CHARTER CORE                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │                    ┌─────────────────┐                          │
//! │                    │    Moderator    │  ← run(submission)       │
//! │                    └────────┬────────┘                          │
//! │                             │                                   │
//! │         ┌───────────────────┼───────────────────┐               │
//! │         ▼                   ▼                   ▼               │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐          │
//! │  │ RuleEngine  │    │  Semantic   │    │ AuditSink   │          │
//! │  │  (Layer A)  │    │ Classifier  │    │  (ledger)   │          │
//! │  └─────────────┘    └─────────────┘    └─────────────┘          │
//! │                                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use charter_core::{CharterConfig, ContentSubmission, ContentType, Moderator};
//!
//! let config = CharterConfig::from_file("charter.json")?;
//! let moderator = Moderator::from_config(&config, classifier, Some(audit))?;
//!
//! let record = moderator
//!     .run(ContentSubmission::new("Community food bank needs volunteers", ContentType::Problem))
//!     .await?;
//! println!("{}", record.final_decision());
//! ```
//!
//! ## Guarantees
//!
//! - A Layer A match always rejects, and Layer B is never called for it
//! - Layer B errors never approve; unresolved runs are flagged as pending
//! - A completed run appends exactly one record; a cancelled run appends none
//! - The composite solution score never changes the decision

mod audit;
mod config;
mod error;
mod moderator;
mod record;
mod retry;
mod scoring;

pub use audit::{AuditSink, LedgerAuditSink, MemoryAuditSink};
pub use config::{AuditConfig, CharterConfig, ClassifierConfig, OrchestratorConfig};
pub use error::CharterError;
pub use moderator::{Moderator, DEFAULT_LAYER_B_TIMEOUT, DEFAULT_MAX_CONCURRENT_CALLS};
pub use record::{ContentSubmission, Disposition, EvaluationRecord, PendingKind, PendingReason};
pub use retry::RetryPolicy;
pub use scoring::{composite_score, COST_EFFICIENCY_WEIGHT, FEASIBILITY_WEIGHT, IMPACT_WEIGHT};

// Re-export component types for convenience
pub use charter_classifier::{
    AlignmentScore, ClassifierError, ClassifierRevision, ContentType, Decision, LayerBResult, Level,
    SemanticClassifier, SolutionScores, UnconfiguredClassifier,
};
pub use charter_ledger::{ChainVerification, Ledger};
pub use charter_patterns::{ForbiddenPattern, LayerAResult, PatternCatalog, RuleEngine};
pub use tokio_util::sync::CancellationToken;

/// Core result type for moderation operations.
pub type Result<T> = std::result::Result<T, CharterError>;
