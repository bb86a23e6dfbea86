//! The moderation orchestrator.
//!
//! This module provides the main entry point for Charter. The [`Moderator`]
//! runs Layer A, decides whether Layer B is needed, applies the call policy
//! around Layer B, and appends exactly one record per completed run.

use std::sync::Arc;
use std::time::Duration;

use charter_classifier::{ClassifierError, LayerBResult, SemanticClassifier};
use charter_patterns::{PatternCatalog, RuleEngine};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::audit::AuditSink;
use crate::config::CharterConfig;
use crate::error::CharterError;
use crate::record::{ContentSubmission, EvaluationRecord, PendingReason};
use crate::retry::RetryPolicy;
use crate::Result;

/// Default per-attempt Layer B deadline.
pub const DEFAULT_LAYER_B_TIMEOUT: Duration = Duration::from_secs(10);

/// Default bound on in-flight Layer B calls.
pub const DEFAULT_MAX_CONCURRENT_CALLS: usize = 8;

/// Moderation orchestrator.
///
/// # Pipeline
///
/// ```text
/// submission ──► Layer A ──matched──► reject (Layer B skipped)
///                   │
///                 passed
///                   ▼
///               Layer B ──judged──────► Layer B decision (+ composite for solutions)
///                   │
///              unresolved
///                   ▼
///          flag, classification pending
/// ```
///
/// Layer B errors never become an approval. Anything unresolved goes to
/// human review.
///
/// # Concurrency
///
/// `Moderator` is `Send + Sync`; share one behind an `Arc` and call
/// [`Moderator::run`] from as many tasks as needed. Runs share only the
/// read-only catalog and the outbound-call semaphore.
///
/// # Example
///
/// ```rust,ignore
/// let moderator = Moderator::new(engine, classifier).with_audit(sink);
///
/// let record = moderator
///     .run(ContentSubmission::new("Community food bank needs volunteers", ContentType::Problem))
///     .await?;
///
/// match record.disposition() {
///     Disposition::Publish => publish(),
///     Disposition::HoldForReview { context } => enqueue(context),
///     Disposition::Block { summary } => notify(summary),
/// }
/// ```
pub struct Moderator {
    engine: RuleEngine,
    classifier: Arc<dyn SemanticClassifier>,
    audit: Option<Arc<dyn AuditSink>>,
    retry: RetryPolicy,
    layer_b_timeout: Duration,
    permits: Arc<Semaphore>,
}

/// Result of the Layer B phase.
enum LayerBOutcome {
    Judged(LayerBResult),
    Unresolved(PendingReason),
}

impl Moderator {
    /// Creates a moderator with default call policy and no audit sink.
    pub fn new(engine: RuleEngine, classifier: Arc<dyn SemanticClassifier>) -> Self {
        Self {
            engine,
            classifier,
            audit: None,
            retry: RetryPolicy::default(),
            layer_b_timeout: DEFAULT_LAYER_B_TIMEOUT,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT_CALLS)),
        }
    }

    /// Creates a moderator from validated configuration.
    ///
    /// Builds the standard catalog, so catalog errors surface here rather
    /// than on the first submission.
    pub fn from_config(
        config: &CharterConfig,
        classifier: Arc<dyn SemanticClassifier>,
        audit: Option<Arc<dyn AuditSink>>,
    ) -> Result<Self> {
        config.validate()?;
        let catalog = Arc::new(PatternCatalog::standard()?);

        let mut moderator = Self::new(RuleEngine::new(catalog), classifier)
            .with_retry(config.orchestrator.retry_policy())
            .with_layer_b_timeout(config.orchestrator.layer_b_timeout())
            .with_max_concurrent_calls(config.orchestrator.max_concurrent_calls);
        moderator.audit = audit;

        info!(
            classifier = moderator.classifier.name(),
            timeout_ms = config.orchestrator.layer_b_timeout_ms,
            max_attempts = config.orchestrator.max_attempts,
            audit = moderator.audit.as_ref().map(|a| a.name()).unwrap_or("none"),
            "Moderator initialized"
        );
        Ok(moderator)
    }

    pub fn with_audit(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_layer_b_timeout(mut self, timeout: Duration) -> Self {
        self.layer_b_timeout = timeout;
        self
    }

    pub fn with_max_concurrent_calls(mut self, limit: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(limit.clamp(1, Semaphore::MAX_PERMITS)));
        self
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Moderates one submission.
    pub async fn run(&self, submission: ContentSubmission) -> Result<EvaluationRecord> {
        self.run_with_cancel(submission, CancellationToken::new()).await
    }

    /// Moderates one submission, abandoning it if `cancel` fires.
    ///
    /// On cancellation the in-flight Layer B call is dropped, no record is
    /// appended, and [`CharterError::Cancelled`] is returned.
    pub async fn run_with_cancel(
        &self,
        submission: ContentSubmission,
        cancel: CancellationToken,
    ) -> Result<EvaluationRecord> {
        if cancel.is_cancelled() {
            return Err(CharterError::Cancelled);
        }

        let content_type = submission.content_type;
        let layer_a = self.engine.evaluate(&submission.content);
        let revision = self.classifier.revision();

        let record = if !layer_a.passed {
            info!(
                content_type = %content_type,
                matched = ?layer_a.matched_patterns,
                "Layer A rejected submission"
            );
            EvaluationRecord::rejected_by_patterns(content_type, layer_a)
        } else {
            match self.classify(&submission, &cancel).await? {
                LayerBOutcome::Judged(layer_b) => {
                    info!(
                        content_type = %content_type,
                        decision = %layer_b.decision,
                        score = %layer_b.alignment_score,
                        domain = %layer_b.aligned_domain,
                        "Layer B judged submission"
                    );
                    EvaluationRecord::classified(content_type, layer_a, layer_b, revision)
                }
                LayerBOutcome::Unresolved(reason) => {
                    warn!(
                        content_type = %content_type,
                        kind = reason.kind.as_str(),
                        attempts = reason.attempts,
                        "Classification pending, routing to human review"
                    );
                    EvaluationRecord::pending_review(content_type, layer_a, reason, revision)
                }
            }
        };

        if cancel.is_cancelled() {
            return Err(CharterError::Cancelled);
        }

        self.persist(record)
    }

    /// Runs Layer B under the retry policy.
    ///
    /// Only `Unavailable` is retried. Returns `Err` only on cancellation.
    async fn classify(
        &self,
        submission: &ContentSubmission,
        cancel: &CancellationToken,
    ) -> Result<LayerBOutcome> {
        let attempts = self.retry.attempts();

        for attempt in 1..=attempts {
            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(attempt, "Layer B call cancelled");
                    return Err(CharterError::Cancelled);
                }
                result = self.attempt(submission) => result,
            };

            let err = match result {
                Ok(layer_b) => return Ok(LayerBOutcome::Judged(layer_b)),
                Err(err) => err,
            };

            if err.is_retryable() && attempt < attempts {
                let delay = self.retry.backoff_delay(attempt - 1);
                warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Layer B unavailable, retrying"
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(CharterError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                continue;
            }

            match &err {
                ClassifierError::ProviderRejected { .. } | ClassifierError::Configuration(_) => {
                    error!(classifier = self.classifier.name(), error = %err, "Layer B provider refused request");
                }
                ClassifierError::Unavailable(_) => {
                    warn!(attempts = attempt, error = %err, "Layer B retries exhausted");
                }
                ClassifierError::ResponseInvalid(_) | ClassifierError::ContractViolation { .. } => {
                    warn!(
                        classifier = self.classifier.name(),
                        error = %err,
                        "Layer B response rejected; possible prompt or model regression"
                    );
                }
            }
            return Ok(LayerBOutcome::Unresolved(PendingReason::from_error(&err, attempt)));
        }

        // attempts() is at least 1, so the loop always returns.
        Ok(LayerBOutcome::Unresolved(PendingReason::from_error(
            &ClassifierError::Unavailable("no attempts made".into()),
            0,
        )))
    }

    /// One bounded Layer B call.
    ///
    /// The permit is held for the call only, never across backoff.
    async fn attempt(&self, submission: &ContentSubmission) -> std::result::Result<LayerBResult, ClassifierError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| ClassifierError::Unavailable("call limiter closed".into()))?;

        let call = self
            .classifier
            .classify(&submission.content, submission.content_type);
        let layer_b = match tokio::time::timeout(self.layer_b_timeout, call).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ClassifierError::Unavailable(format!(
                    "timed out after {}ms",
                    self.layer_b_timeout.as_millis()
                )))
            }
        };

        // The score is authoritative whatever the adapter claims.
        let expected = layer_b.alignment_score.band();
        if layer_b.decision != expected {
            return Err(ClassifierError::ContractViolation {
                score: layer_b.alignment_score.value(),
                stated: layer_b.decision,
                expected,
            });
        }

        Ok(layer_b)
    }

    fn persist(&self, record: EvaluationRecord) -> Result<EvaluationRecord> {
        let Some(sink) = &self.audit else {
            return Ok(record);
        };

        match sink.append(&record) {
            Ok(()) => Ok(record),
            Err(err) => {
                error!(record = %record.id(), sink = sink.name(), error = %err, "Failed to append evaluation record");
                Err(CharterError::NotRecorded {
                    record: Box::new(record),
                    reason: err.to_string(),
                })
            }
        }
    }
}

impl std::fmt::Debug for Moderator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Moderator")
            .field("classifier", &self.classifier.name())
            .field("retry", &self.retry)
            .field("layer_b_timeout", &self.layer_b_timeout)
            .field("audit", &self.audit.as_ref().map(|a| a.name()))
            .finish()
    }
}
