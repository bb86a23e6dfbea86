//! Rule engine facade
//!
//! Runs every catalog matcher independently against the full content and
//! reports all matches with the wall-clock time spent.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::catalog::PatternCatalog;
use crate::models::LayerAResult;

/// Layer A evaluator.
///
/// Holds a shared handle to a pre-compiled [`PatternCatalog`]; cloning the
/// engine is cheap and every clone evaluates against the same catalog.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    catalog: Arc<PatternCatalog>,
}

impl RuleEngine {
    /// Create an engine over an already-built catalog.
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// The catalog this engine evaluates against.
    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Evaluate content against every forbidden concept.
    ///
    /// Matches are not mutually exclusive. The empty string passes.
    pub fn evaluate(&self, content: &str) -> LayerAResult {
        let start = Instant::now();

        let matched = self
            .catalog
            .definitions()
            .iter()
            .filter(|definition| definition.is_match(content))
            .map(|definition| definition.pattern())
            .collect::<Vec<_>>();

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        if !matched.is_empty() {
            debug!(
                matches = matched.len(),
                elapsed_ms, "Layer A matched forbidden patterns: {:?}", matched
            );
        }

        LayerAResult::from_matches(matched, elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ForbiddenPattern;

    fn engine() -> RuleEngine {
        RuleEngine::new(Arc::new(PatternCatalog::standard().unwrap()))
    }

    #[test]
    fn test_clean_input_passes() {
        let result = engine().evaluate("Community food bank needs volunteers to distribute meals");
        assert!(result.passed);
        assert!(result.matched_patterns.is_empty());
    }

    #[test]
    fn test_empty_input_passes() {
        let result = engine().evaluate("");
        assert!(result.passed);
        assert!(result.execution_time_ms >= 0.0);
    }

    #[test]
    fn test_surveillance_scenario() {
        let result =
            engine().evaluate("Install surveillance cameras to monitor all neighborhood entrances");
        assert!(!result.passed);
        assert_eq!(result.matched_patterns, vec![ForbiddenPattern::Surveillance]);
    }

    #[test]
    fn test_multiple_matches_in_catalog_order() {
        // Text order is the reverse of catalog order.
        let result = engine().evaluate("Buy a bomb, then plant spyware on their phones");
        assert_eq!(
            result.matched_patterns,
            vec![ForbiddenPattern::Surveillance, ForbiddenPattern::Weapons]
        );
    }

    #[test]
    fn test_case_insensitive_patterns() {
        let e = engine();
        let upper = e.evaluate("SURVEILLANCE");
        let mixed = e.evaluate("SuRvEiLLaNcE");
        let lower = e.evaluate("surveillance");

        assert_eq!(upper.matched_patterns, vec![ForbiddenPattern::Surveillance]);
        assert_eq!(upper.matched_patterns, mixed.matched_patterns);
        assert_eq!(mixed.matched_patterns, lower.matched_patterns);
    }

    #[test]
    fn test_punctuation_adjacent_terms_match() {
        let e = engine();
        for text in ["He bought a gun.", "A gun!", "Carrying (gun) permits", "gun,", "\"gun\""] {
            assert!(
                e.evaluate(text).matched(ForbiddenPattern::Weapons),
                "expected weapons match in {:?}",
                text
            );
        }
    }

    #[test]
    fn test_embedded_substrings_do_not_match() {
        let e = engine();
        assert!(e.evaluate("Paint the canoe gunnel before launch").passed);
        assert!(e.evaluate("Signal propagation delays in rural mesh networks").passed);
    }

    #[test]
    fn test_zero_width_split_evades_layer_a() {
        // Accepted gap: obfuscated terms are left to the semantic layer.
        let result = engine().evaluate("Install s\u{200B}urveillance cameras");
        assert!(result.passed);
        let spaced = engine().evaluate("Install s u r v e i l l a n c e cameras");
        assert!(spaced.passed);
    }

    #[test]
    fn test_large_input_is_fast() {
        let paragraph = "Neighbors organized a seed library and weekly repair cafe. ";
        let content = paragraph.repeat(60);
        assert!(content.len() > 3000);

        let result = engine().evaluate(&content);
        assert!(result.passed);
        assert!(
            result.execution_time_ms < latency_ceiling_ms(),
            "took {}ms",
            result.execution_time_ms
        );
    }

    /// Latency ceiling: the real target in release, padded for debug builds.
    fn latency_ceiling_ms() -> f64 {
        if cfg!(debug_assertions) {
            250.0
        } else {
            10.0
        }
    }

    #[test]
    fn test_multilingual_input_is_fast() {
        let paragraph = "Les bénévoles du quartier ont créé une grainothèque à côté de l'école. \
                         Die Nachbarschaft plant gemeinsam einen Gemüsegarten für ältere Menschen. \
                         Воскресный рынок помогает местным фермерам. 社区图书馆延长了开放时间。 ";
        let content = paragraph.repeat(20);
        assert!(content.chars().count() > 3000);
        assert!(!content.is_ascii());

        let e = engine();
        let result = e.evaluate(&content);
        assert!(result.passed);
        assert!(
            result.execution_time_ms < latency_ceiling_ms(),
            "took {}ms",
            result.execution_time_ms
        );

        let tail = format!("{}Ils veulent installer de la surveillance partout.", content);
        let flagged = e.evaluate(&tail);
        assert_eq!(flagged.matched_patterns, vec![ForbiddenPattern::Surveillance]);
        assert!(flagged.execution_time_ms < latency_ceiling_ms(), "took {}ms", flagged.execution_time_ms);
    }

    #[test]
    fn test_terms_glued_to_non_ascii_letters_do_not_match() {
        let e = engine();
        assert!(e.evaluate("Le mot àgun n'existe pas").passed);
        assert!(e.evaluate("Bögun ist ein Ortsname").passed);
        assert!(!e.evaluate("Un gun, près de l'école").passed);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let e = engine();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let e = e.clone();
                std::thread::spawn(move || e.evaluate("weapons cache").passed)
            })
            .collect();
        for handle in handles {
            assert!(!handle.join().unwrap());
        }
    }
}
