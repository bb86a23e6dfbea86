//! Shared fakes for orchestrator tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use charter_core::{
    AlignmentScore, ClassifierError, ClassifierRevision, ContentType, Decision, LayerBResult, Level,
    Moderator, PatternCatalog, RetryPolicy, RuleEngine, SemanticClassifier, SolutionScores,
};

pub const FAKE_MODEL: &str = "fake-model";
pub const FAKE_CORPUS: &str = "fake-corpus-v1";

/// What the fake does on one call.
#[derive(Debug, Clone)]
pub enum Step {
    Reply(LayerBResult),
    Fail(ClassifierError),
    /// Never answers within any test timeout.
    Hang,
}

/// Deterministic Layer B stand-in with call accounting.
pub struct FakeClassifier {
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
}

impl FakeClassifier {
    /// Answers every call with `step`.
    pub fn always(step: Step) -> Arc<Self> {
        Self::scripted(vec![], step)
    }

    /// Plays `script` in order, then repeats `fallback`.
    pub fn scripted(script: Vec<Step>, fallback: Step) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: Duration::ZERO,
        })
    }

    /// Answers with `step` after `delay`, tracking concurrent calls.
    pub fn slow(step: Step, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: step,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SemanticClassifier for FakeClassifier {
    fn name(&self) -> &str {
        "fake"
    }

    fn revision(&self) -> Option<ClassifierRevision> {
        Some(ClassifierRevision {
            model: FAKE_MODEL.to_string(),
            few_shot_version: FAKE_CORPUS.to_string(),
        })
    }

    async fn classify(
        &self,
        _content: &str,
        _content_type: ContentType,
    ) -> Result<LayerBResult, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = match step {
            Step::Reply(result) => Ok(result),
            Step::Fail(err) => Err(err),
            Step::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(ClassifierError::Unavailable("unreachable".into()))
            }
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// A consistent judgment for `score` in `domain`.
pub fn judgment(score: f64, domain: &str) -> LayerBResult {
    let alignment_score = AlignmentScore::new(score).unwrap();
    LayerBResult {
        aligned_domain: domain.to_string(),
        alignment_score,
        harm_risk: Level::Low,
        feasibility: Level::High,
        quality: "Clear and specific".to_string(),
        decision: alignment_score.band(),
        reasoning: format!("Scored {:.2} for {}", score, domain),
        solution_scores: None,
    }
}

/// A judgment for a solution, with sub-scores.
pub fn solution_judgment(score: f64, impact: u8, feasibility: u8, cost_efficiency: u8) -> LayerBResult {
    LayerBResult {
        solution_scores: Some(SolutionScores {
            impact,
            feasibility,
            cost_efficiency,
        }),
        ..judgment(score, "food_security")
    }
}

/// A judgment whose stated decision contradicts its score.
pub fn mislabeled(score: f64, stated: Decision) -> LayerBResult {
    LayerBResult {
        decision: stated,
        ..judgment(score, "food_security")
    }
}

pub fn engine() -> RuleEngine {
    RuleEngine::new(Arc::new(PatternCatalog::standard().unwrap()))
}

/// Fast retry policy so tests do not sleep for real backoff.
pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        backoff_base: Duration::from_millis(1),
        backoff_max: Duration::from_millis(5),
    }
}

pub fn moderator(classifier: Arc<FakeClassifier>) -> Moderator {
    Moderator::new(engine(), classifier)
        .with_retry(fast_retry(3))
        .with_layer_b_timeout(Duration::from_millis(100))
}
