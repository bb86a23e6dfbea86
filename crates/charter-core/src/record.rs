//! Evaluation record types.
//!
//! One [`EvaluationRecord`] is produced per moderation run. Records have no
//! setters: the orchestrator builds them through the constructors below, and
//! each constructor upholds the layer invariants.
//!
//! | Outcome | `layerB` | `finalDecision` | `pending` |
//! |---------|----------|-----------------|-----------|
//! | Layer A matched | null | reject | null |
//! | Layer B judged | set | Layer B decision | null |
//! | Layer B unresolved | null | flag | set |
//!
//! Records that reached Layer B also carry the classifier's model and
//! few-shot corpus version.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use charter_classifier::{ClassifierError, ClassifierRevision, ContentType, Decision, LayerBResult};
use charter_patterns::LayerAResult;

use crate::scoring::composite_score;

/// Content handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSubmission {
    pub content: String,
    pub content_type: ContentType,
}

impl ContentSubmission {
    pub fn new(content: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            content: content.into(),
            content_type,
        }
    }
}

/// Why Layer B produced no judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingKind {
    Unavailable,
    InvalidResponse,
    ContractViolation,
    ProviderRejected,
    Configuration,
}

impl PendingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingKind::Unavailable => "unavailable",
            PendingKind::InvalidResponse => "invalid_response",
            PendingKind::ContractViolation => "contract_violation",
            PendingKind::ProviderRejected => "provider_rejected",
            PendingKind::Configuration => "configuration",
        }
    }
}

impl From<&ClassifierError> for PendingKind {
    fn from(err: &ClassifierError) -> Self {
        match err {
            ClassifierError::Unavailable(_) => PendingKind::Unavailable,
            ClassifierError::ResponseInvalid(_) => PendingKind::InvalidResponse,
            ClassifierError::ContractViolation { .. } => PendingKind::ContractViolation,
            ClassifierError::ProviderRejected { .. } => PendingKind::ProviderRejected,
            ClassifierError::Configuration(_) => PendingKind::Configuration,
        }
    }
}

/// Attached to records whose classification is still pending human review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReason {
    pub kind: PendingKind,
    pub detail: String,
    /// Layer B attempts made before giving up.
    pub attempts: u32,
}

impl PendingReason {
    pub fn from_error(err: &ClassifierError, attempts: u32) -> Self {
        Self {
            kind: PendingKind::from(err),
            detail: err.to_string(),
            attempts,
        }
    }
}

/// Immutable audit artifact for one moderation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    id: Uuid,
    content_type: ContentType,
    layer_a: LayerAResult,
    layer_b: Option<LayerBResult>,
    final_decision: Decision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    composite_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pending: Option<PendingReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    classifier: Option<ClassifierRevision>,
    created_at: DateTime<Utc>,
}

impl EvaluationRecord {
    /// Layer A matched: deterministic rejection, Layer B never ran.
    pub(crate) fn rejected_by_patterns(content_type: ContentType, layer_a: LayerAResult) -> Self {
        debug_assert!(!layer_a.passed);
        Self {
            id: Uuid::new_v4(),
            content_type,
            layer_a,
            layer_b: None,
            final_decision: Decision::Reject,
            composite_score: None,
            pending: None,
            classifier: None,
            created_at: Utc::now(),
        }
    }

    /// Layer B judged the content. Its decision becomes the final decision.
    pub(crate) fn classified(
        content_type: ContentType,
        layer_a: LayerAResult,
        layer_b: LayerBResult,
        classifier: Option<ClassifierRevision>,
    ) -> Self {
        let composite_score = match (content_type, &layer_b.solution_scores) {
            (ContentType::Solution, Some(scores)) => Some(composite_score(scores)),
            _ => None,
        };
        Self {
            id: Uuid::new_v4(),
            content_type,
            layer_a,
            final_decision: layer_b.decision,
            layer_b: Some(layer_b),
            composite_score,
            pending: None,
            classifier,
            created_at: Utc::now(),
        }
    }

    /// Layer B could not be resolved; route to human review.
    pub(crate) fn pending_review(
        content_type: ContentType,
        layer_a: LayerAResult,
        reason: PendingReason,
        classifier: Option<ClassifierRevision>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            content_type,
            layer_a,
            layer_b: None,
            final_decision: Decision::Flag,
            composite_score: None,
            pending: Some(reason),
            classifier,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn layer_a(&self) -> &LayerAResult {
        &self.layer_a
    }

    pub fn layer_b(&self) -> Option<&LayerBResult> {
        self.layer_b.as_ref()
    }

    pub fn final_decision(&self) -> Decision {
        self.final_decision
    }

    pub fn composite_score(&self) -> Option<f64> {
        self.composite_score
    }

    pub fn pending(&self) -> Option<&PendingReason> {
        self.pending.as_ref()
    }

    /// Model and few-shot corpus consulted, if Layer B ran.
    pub fn classifier_revision(&self) -> Option<&ClassifierRevision> {
        self.classifier.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True when both records reached the same outcome.
    ///
    /// Ignores the record id, the creation time and Layer A's measured time.
    pub fn same_outcome(&self, other: &EvaluationRecord) -> bool {
        self.content_type == other.content_type
            && self.layer_a.passed == other.layer_a.passed
            && self.layer_a.matched_patterns == other.layer_a.matched_patterns
            && self.layer_b == other.layer_b
            && self.final_decision == other.final_decision
            && self.composite_score == other.composite_score
            && self.pending == other.pending
            && self.classifier == other.classifier
    }

    /// What collaborators should do with the content.
    pub fn disposition(&self) -> Disposition<'_> {
        match self.final_decision {
            Decision::Approve => Disposition::Publish,
            Decision::Flag => Disposition::HoldForReview { context: self },
            Decision::Reject => {
                let summary = match &self.layer_b {
                    Some(layer_b) => layer_b.reasoning.clone(),
                    None => self.layer_a.summary(),
                };
                Disposition::Block { summary }
            }
        }
    }
}

/// Effect of a record on publication.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition<'a> {
    /// Publish immediately.
    Publish,

    /// Withhold from default listings and enqueue for human review.
    HoldForReview {
        /// The full record, for reviewer context.
        context: &'a EvaluationRecord,
    },

    /// Block publication and notify the submitter.
    Block {
        /// Matched-pattern summary or the classifier's reasoning.
        summary: String,
    },
}

impl Disposition<'_> {
    pub fn is_published(&self) -> bool {
        matches!(self, Disposition::Publish)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Disposition::Block { .. })
    }

    pub fn requires_review(&self) -> bool {
        matches!(self, Disposition::HoldForReview { .. })
    }
}
