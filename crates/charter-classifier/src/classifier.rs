//! The Layer B port and its prompt-driven implementation.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::backend::CompletionBackend;
use crate::error::ClassifierError;
use crate::few_shot::FEW_SHOT_VERSION;
use crate::models::{ClassifierRevision, ContentType, LayerBResult};
use crate::prompt::{build_request, PromptSettings};
use crate::validate::parse_judgment;

/// Semantic alignment classifier.
///
/// The orchestrator only sees this trait, so it can be driven by a
/// deterministic fake in tests.
///
/// # Implementors
///
/// - [`PromptedClassifier`]: few-shot prompt over a [`CompletionBackend`]
/// - [`UnconfiguredClassifier`]: placeholder when no provider can be built
#[async_trait]
pub trait SemanticClassifier: Send + Sync {
    /// Returns the name of this classifier, for logs.
    fn name(&self) -> &str;

    /// Model and corpus behind this classifier, stamped on every record it
    /// touches. `None` for classifiers without a prompt.
    fn revision(&self) -> Option<ClassifierRevision> {
        None
    }

    /// Classifies one submission.
    ///
    /// # Errors
    /// - [`ClassifierError::Unavailable`] when the provider cannot answer (retryable)
    /// - [`ClassifierError::ResponseInvalid`] when the answer is malformed
    /// - [`ClassifierError::ContractViolation`] when the decision contradicts the score
    async fn classify(
        &self,
        content: &str,
        content_type: ContentType,
    ) -> Result<LayerBResult, ClassifierError>;
}

/// Builds the few-shot prompt, sends it through a backend and validates the reply.
pub struct PromptedClassifier<B> {
    backend: B,
    settings: PromptSettings,
    name: String,
}

impl<B: CompletionBackend> PromptedClassifier<B> {
    pub fn new(backend: B, settings: PromptSettings) -> Self {
        let name = format!("prompted:{}", settings.model);
        Self {
            backend,
            settings,
            name,
        }
    }

    pub fn settings(&self) -> &PromptSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: CompletionBackend> SemanticClassifier for PromptedClassifier<B> {
    fn name(&self) -> &str {
        &self.name
    }

    fn revision(&self) -> Option<ClassifierRevision> {
        Some(ClassifierRevision {
            model: self.settings.model.clone(),
            few_shot_version: FEW_SHOT_VERSION.to_string(),
        })
    }

    async fn classify(
        &self,
        content: &str,
        content_type: ContentType,
    ) -> Result<LayerBResult, ClassifierError> {
        let request = build_request(&self.settings, content, content_type);
        let body = self.backend.complete(&request).await?;

        match parse_judgment(&body, content_type) {
            Ok(result) => {
                debug!(
                    domain = %result.aligned_domain,
                    score = %result.alignment_score,
                    decision = %result.decision,
                    "Classifier judgment accepted"
                );
                Ok(result)
            }
            Err(err) => {
                // Regression signal for prompt or model drift.
                warn!(
                    classifier = %self.name,
                    kind = err.kind(),
                    error = %err,
                    "Classifier response rejected by validation"
                );
                Err(err)
            }
        }
    }
}

/// Placeholder for a classifier that could not be built, such as when the
/// API key is missing.
///
/// Every call fails with [`ClassifierError::Configuration`]. Pattern-layer
/// rejections never reach Layer B, so they are still decided; everything
/// else ends up pending review.
#[derive(Debug, Clone)]
pub struct UnconfiguredClassifier {
    reason: String,
}

impl UnconfiguredClassifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl SemanticClassifier for UnconfiguredClassifier {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn classify(
        &self,
        _content: &str,
        _content_type: ContentType,
    ) -> Result<LayerBResult, ClassifierError> {
        Err(ClassifierError::Configuration(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Decision;
    use crate::prompt::CompletionRequest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedBackend {
        reply: Result<String, ClassifierError>,
        calls: AtomicUsize,
        last: Mutex<Option<CompletionRequest>>,
    }

    impl ScriptedBackend {
        fn new(reply: Result<String, ClassifierError>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            self.reply.clone()
        }
    }

    const FOOD_BANK: &str = r#"{"alignedDomain":"food_security","alignmentScore":0.85,"harmRisk":"low","feasibility":"high","quality":"Clear call for help","decision":"approve","reasoning":"Volunteers distributing meals directly reduces hunger."}"#;

    #[tokio::test]
    async fn test_valid_reply_is_accepted() {
        let classifier =
            PromptedClassifier::new(ScriptedBackend::new(Ok(FOOD_BANK.to_string())), PromptSettings::default());

        let result = classifier
            .classify("Community food bank needs volunteers to distribute meals", ContentType::Problem)
            .await
            .unwrap();

        assert_eq!(result.decision, Decision::Approve);
        assert_eq!(result.aligned_domain, "food_security");
        assert_eq!(classifier.backend().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_content_is_last_turn() {
        let classifier =
            PromptedClassifier::new(ScriptedBackend::new(Ok(FOOD_BANK.to_string())), PromptSettings::default());
        classifier.classify("needle text", ContentType::Debate).await.unwrap();

        let request = classifier.backend().last.lock().unwrap().clone().unwrap();
        assert!(request.messages.last().unwrap().content.contains("needle text"));
    }

    #[tokio::test]
    async fn test_backend_errors_pass_through() {
        let classifier = PromptedClassifier::new(
            ScriptedBackend::new(Err(ClassifierError::Unavailable("connection refused".into()))),
            PromptSettings::default(),
        );
        let err = classifier.classify("x", ContentType::Problem).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_prose_reply_is_invalid() {
        let classifier = PromptedClassifier::new(
            ScriptedBackend::new(Ok("Sure! This looks fine to me.".to_string())),
            PromptSettings::default(),
        );
        let err = classifier.classify("x", ContentType::Problem).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_response");
    }

    #[tokio::test]
    async fn test_solution_reply_needs_scores() {
        let classifier =
            PromptedClassifier::new(ScriptedBackend::new(Ok(FOOD_BANK.to_string())), PromptSettings::default());
        let err = classifier.classify("x", ContentType::Solution).await.unwrap_err();
        assert_eq!(err.kind(), "invalid_response");
    }

    #[test]
    fn test_name_includes_model() {
        let classifier =
            PromptedClassifier::new(ScriptedBackend::new(Ok(String::new())), PromptSettings::default());
        assert!(classifier.name().starts_with("prompted:"));
    }

    #[tokio::test]
    async fn test_unconfigured_always_fails_without_retry() {
        let classifier = UnconfiguredClassifier::new("environment variable ANTHROPIC_API_KEY is not set");
        let err = classifier.classify("x", ContentType::Problem).await.unwrap_err();
        assert_eq!(err.kind(), "configuration");
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
        assert!(classifier.revision().is_none());
    }

    #[test]
    fn test_revision_names_model_and_corpus() {
        let settings = PromptSettings {
            model: "claude-test".into(),
            ..PromptSettings::default()
        };
        let classifier = PromptedClassifier::new(ScriptedBackend::new(Ok(String::new())), settings);
        let revision = classifier.revision().unwrap();
        assert_eq!(revision.model, "claude-test");
        assert_eq!(revision.few_shot_version, FEW_SHOT_VERSION);
    }
}
