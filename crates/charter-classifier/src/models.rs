//! Classifier data types.
//!
//! Defines the content taxonomy, the decision vocabulary, the validated
//! alignment score, and the [`LayerBResult`] produced for each accepted
//! response.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lower edge of the flag band.
pub const FLAG_THRESHOLD: f64 = 0.40;

/// Lower edge of the approve band.
pub const APPROVE_THRESHOLD: f64 = 0.70;

/// Kind of submission being moderated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// A reported problem.
    Problem,
    /// A proposed solution to a problem.
    Solution,
    /// A post in a debate thread.
    Debate,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Problem => "problem",
            ContentType::Solution => "solution",
            ContentType::Debate => "debate",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "problem" => Ok(ContentType::Problem),
            "solution" => Ok(ContentType::Solution),
            "debate" => Ok(ContentType::Debate),
            other => Err(format!("unknown content type '{}'", other)),
        }
    }
}

/// Moderation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Publish immediately.
    Approve,
    /// Withhold and send to human review.
    Flag,
    /// Block from publication.
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::Flag => "flag",
            Decision::Reject => "reject",
        }
    }

    /// Parses the exact lowercase wire form.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(Decision::Approve),
            "flag" => Some(Decision::Flag),
            "reject" => Some(Decision::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-step rating used for harm risk and feasibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }

    /// Parses the exact lowercase wire form.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Level::Low),
            "medium" => Some(Level::Medium),
            "high" => Some(Level::High),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alignment score in `[0.0, 1.0]`.
///
/// Unlike a bare `f64`, a value of this type is always finite and in range.
/// The score is the ground truth for the decision; see [`AlignmentScore::band`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct AlignmentScore(f64);

impl AlignmentScore {
    /// Creates a score, returning `None` when the value is outside `[0, 1]`
    /// or not finite.
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// The decision implied by the score.
    ///
    /// | Score | Decision |
    /// |-------|----------|
    /// | `< 0.40` | reject |
    /// | `0.40 ..< 0.70` | flag |
    /// | `>= 0.70` | approve |
    pub fn band(&self) -> Decision {
        if self.0 >= APPROVE_THRESHOLD {
            Decision::Approve
        } else if self.0 >= FLAG_THRESHOLD {
            Decision::Flag
        } else {
            Decision::Reject
        }
    }
}

impl TryFrom<f64> for AlignmentScore {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        AlignmentScore::new(value)
            .ok_or_else(|| format!("alignment score {} outside [0.0, 1.0]", value))
    }
}

impl From<AlignmentScore> for f64 {
    fn from(score: AlignmentScore) -> f64 {
        score.0
    }
}

impl fmt::Display for AlignmentScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Sub-scores the classifier assigns to a proposed solution, each 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionScores {
    pub impact: u8,
    pub feasibility: u8,
    pub cost_efficiency: u8,
}

/// Which model and few-shot corpus a classifier answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierRevision {
    pub model: String,
    pub few_shot_version: String,
}

/// A validated Layer B judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerBResult {
    /// Approved domain the content best fits, or `none`.
    pub aligned_domain: String,
    /// Confidence that the content aligns with policy.
    pub alignment_score: AlignmentScore,
    /// Estimated risk of harm.
    pub harm_risk: Level,
    /// Estimated practicality.
    pub feasibility: Level,
    /// Short quality assessment for reviewers.
    pub quality: String,
    /// Decision; always equal to `alignment_score.band()`.
    pub decision: Decision,
    /// Reasoning shown to reviewers and, on rejection, the submitter.
    pub reasoning: String,
    /// Present only for solutions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_scores: Option<SolutionScores>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_range() {
        assert!(AlignmentScore::new(0.0).is_some());
        assert!(AlignmentScore::new(1.0).is_some());
        assert!(AlignmentScore::new(-0.01).is_none());
        assert!(AlignmentScore::new(1.01).is_none());
        assert!(AlignmentScore::new(f64::NAN).is_none());
        assert!(AlignmentScore::new(f64::INFINITY).is_none());
    }

    #[test]
    fn test_band_boundaries() {
        let band = |v: f64| AlignmentScore::new(v).unwrap().band();
        assert_eq!(band(0.0), Decision::Reject);
        assert_eq!(band(0.39), Decision::Reject);
        assert_eq!(band(0.40), Decision::Flag);
        assert_eq!(band(0.69), Decision::Flag);
        assert_eq!(band(0.70), Decision::Approve);
        assert_eq!(band(1.0), Decision::Approve);
    }

    #[test]
    fn test_band_is_total_over_range() {
        for step in 0..=1000 {
            let value = step as f64 / 1000.0;
            let expected = if value < 0.40 {
                Decision::Reject
            } else if value < 0.70 {
                Decision::Flag
            } else {
                Decision::Approve
            };
            assert_eq!(AlignmentScore::new(value).unwrap().band(), expected, "at {}", value);
        }
    }

    #[test]
    fn test_score_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<AlignmentScore>("0.5").is_ok());
        assert!(serde_json::from_str::<AlignmentScore>("1.5").is_err());
    }

    #[test]
    fn test_wire_forms() {
        assert_eq!(serde_json::to_string(&Decision::Flag).unwrap(), "\"flag\"");
        assert_eq!(serde_json::to_string(&Level::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&ContentType::Debate).unwrap(), "\"debate\"");
        assert_eq!(Decision::from_wire("Approve"), None);
        assert_eq!("solution".parse::<ContentType>(), Ok(ContentType::Solution));
    }

    #[test]
    fn test_solution_scores_wire_shape() {
        let scores = SolutionScores {
            impact: 75,
            feasibility: 80,
            cost_efficiency: 60,
        };
        let json = serde_json::to_value(scores).unwrap();
        assert_eq!(json["costEfficiency"], 60);
    }
}
