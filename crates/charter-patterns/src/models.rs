//! # Core Types for the Pattern Layer
//!
//! This module defines the fixed forbidden-concept taxonomy, the result type
//! produced by the rule engine, and catalog construction errors.
//!
//! ## Design Principles
//!
//! 1. **Closed Taxonomy** - Exactly twelve concepts, in a fixed catalog order
//! 2. **Stable Wire Names** - Concepts serialize as snake_case names that
//!    downstream reviewers and analytics key on
//! 3. **Self-Consistent Results** - [`LayerAResult::passed`] is derived from
//!    the match list and cannot disagree with it

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of concepts in the forbidden catalog.
pub const PATTERN_COUNT: usize = 12;

/// A forbidden concept from the constitutional policy.
///
/// The declaration order is the catalog order. Match lists are always
/// reported in this order, regardless of where the terms occur in the text.
///
/// | Variant | Wire name |
/// |---------|-----------|
/// | `Surveillance` | `surveillance` |
/// | `Weapons` | `weapons` |
/// | `PoliticalManipulation` | `political_manipulation` |
/// | `FinancialExploitation` | `financial_exploitation` |
/// | `Discrimination` | `discrimination` |
/// | `PseudoScience` | `pseudo_science` |
/// | `PrivacyViolation` | `privacy_violation` |
/// | `Deepfakes` | `deepfakes` |
/// | `SocialEngineering` | `social_engineering` |
/// | `MarketManipulation` | `market_manipulation` |
/// | `LaborExploitation` | `labor_exploitation` |
/// | `HateSpeech` | `hate_speech` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForbiddenPattern {
    Surveillance,
    Weapons,
    PoliticalManipulation,
    FinancialExploitation,
    Discrimination,
    PseudoScience,
    PrivacyViolation,
    Deepfakes,
    SocialEngineering,
    MarketManipulation,
    LaborExploitation,
    HateSpeech,
}

impl ForbiddenPattern {
    /// Every concept, in catalog order.
    pub const ALL: [ForbiddenPattern; PATTERN_COUNT] = [
        ForbiddenPattern::Surveillance,
        ForbiddenPattern::Weapons,
        ForbiddenPattern::PoliticalManipulation,
        ForbiddenPattern::FinancialExploitation,
        ForbiddenPattern::Discrimination,
        ForbiddenPattern::PseudoScience,
        ForbiddenPattern::PrivacyViolation,
        ForbiddenPattern::Deepfakes,
        ForbiddenPattern::SocialEngineering,
        ForbiddenPattern::MarketManipulation,
        ForbiddenPattern::LaborExploitation,
        ForbiddenPattern::HateSpeech,
    ];

    /// The snake_case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ForbiddenPattern::Surveillance => "surveillance",
            ForbiddenPattern::Weapons => "weapons",
            ForbiddenPattern::PoliticalManipulation => "political_manipulation",
            ForbiddenPattern::FinancialExploitation => "financial_exploitation",
            ForbiddenPattern::Discrimination => "discrimination",
            ForbiddenPattern::PseudoScience => "pseudo_science",
            ForbiddenPattern::PrivacyViolation => "privacy_violation",
            ForbiddenPattern::Deepfakes => "deepfakes",
            ForbiddenPattern::SocialEngineering => "social_engineering",
            ForbiddenPattern::MarketManipulation => "market_manipulation",
            ForbiddenPattern::LaborExploitation => "labor_exploitation",
            ForbiddenPattern::HateSpeech => "hate_speech",
        }
    }

    /// Prose description of the concept.
    ///
    /// This is what the semantic classifier sees; the regex term lists never
    /// leave this crate.
    pub fn description(&self) -> &'static str {
        match self {
            ForbiddenPattern::Surveillance => {
                "Monitoring, tracking or recording people without their knowledge or consent, \
                 including spyware, covert cameras and mass monitoring of a community"
            }
            ForbiddenPattern::Weapons => {
                "Building, acquiring, distributing or using firearms, explosives or other weapons"
            }
            ForbiddenPattern::PoliticalManipulation => {
                "Propaganda, disinformation campaigns, voter suppression or any attempt to \
                 rig or interfere with elections"
            }
            ForbiddenPattern::FinancialExploitation => {
                "Ponzi or pyramid schemes, predatory lending, money laundering or scams that \
                 target vulnerable people"
            }
            ForbiddenPattern::Discrimination => {
                "Treating people differently because of race, religion, ethnicity, gender, \
                 disability or caste, including profiling and segregation"
            }
            ForbiddenPattern::PseudoScience => {
                "Promoting unproven or disproven health and science claims such as miracle \
                 cures, homeopathy in place of medicine, or anti-vaccine content"
            }
            ForbiddenPattern::PrivacyViolation => {
                "Doxxing, scraping or selling personal data, or exposing private information \
                 about identifiable people"
            }
            ForbiddenPattern::Deepfakes => {
                "Synthetic media that impersonates real people, including face swaps and \
                 voice cloning"
            }
            ForbiddenPattern::SocialEngineering => {
                "Phishing, pretexting, impersonation or other deception used to obtain \
                 credentials, money or access"
            }
            ForbiddenPattern::MarketManipulation => {
                "Pump-and-dump schemes, insider trading, wash trading, spoofing or price fixing"
            }
            ForbiddenPattern::LaborExploitation => {
                "Child labor, forced labor, sweatshops, wage theft, debt bondage or trafficking"
            }
            ForbiddenPattern::HateSpeech => {
                "Content that attacks or dehumanizes people for who they are, including slurs, \
                 hate groups and supremacist ideology"
            }
        }
    }
}

impl fmt::Display for ForbiddenPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForbiddenPattern {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForbiddenPattern::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownPattern(s.to_string()))
    }
}

/// Outcome of running the rule engine over one piece of content.
///
/// `passed` is true exactly when `matched_patterns` is empty; use
/// [`LayerAResult::from_matches`] to keep the two consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerAResult {
    /// True when no forbidden pattern matched.
    pub passed: bool,
    /// Matched concepts, in catalog order.
    pub matched_patterns: Vec<ForbiddenPattern>,
    /// Wall-clock time spent matching, in milliseconds.
    pub execution_time_ms: f64,
}

impl LayerAResult {
    /// Builds a result from the matched concepts and the measured time.
    pub fn from_matches(matched_patterns: Vec<ForbiddenPattern>, execution_time_ms: f64) -> Self {
        Self {
            passed: matched_patterns.is_empty(),
            matched_patterns,
            execution_time_ms,
        }
    }

    /// Returns true if `pattern` is among the matches.
    pub fn matched(&self, pattern: ForbiddenPattern) -> bool {
        self.matched_patterns.contains(&pattern)
    }

    /// Human-readable summary shown to a submitter whose content was blocked.
    pub fn summary(&self) -> String {
        if self.passed {
            return "No forbidden patterns matched".to_string();
        }
        let names: Vec<&str> = self.matched_patterns.iter().map(|p| p.as_str()).collect();
        format!("Matched forbidden patterns: {}", names.join(", "))
    }
}

/// Errors raised while building the pattern catalog.
///
/// These surface once, at bootstrap. Evaluating content never fails.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A term list failed to compile into a matcher.
    #[error("Pattern '{pattern}' failed to compile: {source}")]
    Compile {
        /// The concept whose matcher failed.
        pattern: ForbiddenPattern,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A concept has no terms to match.
    #[error("Pattern '{0}' has no terms")]
    EmptyTerms(ForbiddenPattern),

    /// A name did not correspond to any concept.
    #[error("Unknown forbidden pattern: {0}")]
    UnknownPattern(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_twelve_patterns() {
        assert_eq!(ForbiddenPattern::ALL.len(), 12);
    }

    #[test]
    fn test_wire_names_match_serde() {
        for pattern in ForbiddenPattern::ALL {
            let json = serde_json::to_string(&pattern).unwrap();
            assert_eq!(json, format!("\"{}\"", pattern.as_str()));
        }
    }

    #[test]
    fn test_from_str_roundtrip_and_unknown() {
        assert_eq!(
            "market_manipulation".parse::<ForbiddenPattern>().unwrap(),
            ForbiddenPattern::MarketManipulation
        );
        assert!(matches!(
            "gambling".parse::<ForbiddenPattern>(),
            Err(CatalogError::UnknownPattern(_))
        ));
    }

    #[test]
    fn test_descriptions_are_prose_not_regex() {
        for pattern in ForbiddenPattern::ALL {
            let description = pattern.description();
            assert!(!description.is_empty());
            assert!(!description.contains("\\b"));
            assert!(!description.contains("(?"));
        }
    }

    #[test]
    fn test_passed_follows_matches() {
        let clean = LayerAResult::from_matches(vec![], 0.2);
        assert!(clean.passed);

        let dirty = LayerAResult::from_matches(vec![ForbiddenPattern::Weapons], 0.2);
        assert!(!dirty.passed);
        assert!(dirty.matched(ForbiddenPattern::Weapons));
    }

    #[test]
    fn test_summary_lists_names() {
        let result = LayerAResult::from_matches(
            vec![ForbiddenPattern::Surveillance, ForbiddenPattern::HateSpeech],
            1.0,
        );
        assert_eq!(
            result.summary(),
            "Matched forbidden patterns: surveillance, hate_speech"
        );
    }

    #[test]
    fn test_layer_a_result_wire_shape() {
        let result = LayerAResult::from_matches(vec![ForbiddenPattern::Deepfakes], 0.5);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["passed"], false);
        assert_eq!(json["matchedPatterns"][0], "deepfakes");
        assert_eq!(json["executionTimeMs"], 0.5);
    }
}
