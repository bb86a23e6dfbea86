//! # Semantic Classifier
//!
//! Layer B of the moderation pipeline: an LLM judges whether content aligns
//! with the platform constitution.
//!
//! ## Overview
//!
//! Layer A catches explicit forbidden terms. Everything subtler (dual-use
//! proposals, health misinformation phrased politely, manipulation without
//! the trigger words) reaches this crate. The model is asked for a fixed JSON
//! judgment, and that judgment is treated as untrusted input: it is validated
//! field by field before anything downstream sees it.
//!
//! ## Score Bands
//!
//! The numeric `alignmentScore` is authoritative. A response whose stated
//! `decision` disagrees with its own band is refused.
//!
//! | Score | Decision |
//! |-------|----------|
//! | `< 0.40` | reject |
//! | `0.40 ..< 0.70` | flag |
//! | `>= 0.70` | approve |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │ SemanticClassifier   │  port seen by the orchestrator
//! └──────────┬───────────┘
//!            ▼
//! ┌──────────────────────┐     ┌──────────────┐
//! │ PromptedClassifier   │────►│ prompt       │ system + few-shot + content
//! └──────────┬───────────┘     └──────────────┘
//!            ▼
//! ┌──────────────────────┐
//! │ CompletionBackend    │  AnthropicBackend (reqwest) or a test double
//! └──────────┬───────────┘
//!            ▼
//! ┌──────────────────────┐
//! │ validate             │  presence / type / range / band checks
//! └──────────────────────┘
//! ```
//!
//! ## Failure Classes
//!
//! | Error | Cause | Retry? |
//! |-------|-------|--------|
//! | `Unavailable` | network, timeout, 429, 5xx | yes |
//! | `ResponseInvalid` | not JSON, missing field, out of range | no |
//! | `ContractViolation` | decision contradicts band | no |
//! | `ProviderRejected` | other 4xx (e.g. bad key) | no |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use charter_classifier::{
//!     AnthropicBackend, BackendSettings, ContentType, PromptSettings, PromptedClassifier,
//!     SemanticClassifier,
//! };
//!
//! let backend = AnthropicBackend::new(BackendSettings::new(api_key))?;
//! let classifier = PromptedClassifier::new(backend, PromptSettings::default());
//!
//! let result = classifier
//!     .classify("Community food bank needs volunteers", ContentType::Problem)
//!     .await?;
//! println!("{} ({})", result.decision, result.alignment_score);
//! ```

pub mod backend;
pub mod classifier;
pub mod error;
pub mod few_shot;
pub mod models;
pub mod prompt;
pub mod validate;

pub use backend::{AnthropicBackend, BackendSettings, CompletionBackend};
pub use classifier::{PromptedClassifier, SemanticClassifier, UnconfiguredClassifier};
pub use error::ClassifierError;
pub use few_shot::{FewShotExample, FEW_SHOT_VERSION};
pub use models::{
    AlignmentScore, ClassifierRevision, ContentType, Decision, LayerBResult, Level, SolutionScores,
    APPROVE_THRESHOLD, FLAG_THRESHOLD,
};
pub use prompt::{build_request, system_prompt, ChatMessage, CompletionRequest, PromptSettings, Role};
pub use validate::parse_judgment;

/// Result type for classifier operations.
pub type Result<T> = std::result::Result<T, ClassifierError>;
