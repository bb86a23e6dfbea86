//! Strict validation of classifier responses.
//!
//! The model's reply is untrusted text. Instead of deserializing straight into
//! [`LayerBResult`] and trusting whatever shape comes back, every field is
//! checked for presence, JSON type and range, and the stated decision is
//! recomputed from the score band.
//!
//! ```text
//!   body ──trim──► JSON object? ──► fields present/typed/in range? ──► decision == band?
//!                      │                       │                             │
//!                      ▼                       ▼                             ▼
//!               ResponseInvalid         ResponseInvalid              ContractViolation
//! ```
//!
//! Surrounding whitespace is the only leniency: code fences or prose around
//! the object are rejected.

use serde_json::{Map, Value};

use crate::error::ClassifierError;
use crate::models::{AlignmentScore, ContentType, Decision, LayerBResult, Level, SolutionScores};

/// Upper bound for each solution sub-score.
pub const MAX_SUB_SCORE: u64 = 100;

/// Parses and validates one response body.
///
/// `solutionScores` is required for solutions and ignored for every other
/// content type.
pub fn parse_judgment(body: &str, content_type: ContentType) -> Result<LayerBResult, ClassifierError> {
    let value: Value = serde_json::from_str(body.trim())
        .map_err(|e| invalid(format!("body is not JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| invalid("body is not a JSON object"))?;

    let aligned_domain = non_empty_string(object, "alignedDomain")?;

    let raw_score = required(object, "alignmentScore")?
        .as_f64()
        .ok_or_else(|| invalid("alignmentScore must be a number"))?;
    let alignment_score = AlignmentScore::new(raw_score)
        .ok_or_else(|| invalid(format!("alignmentScore {} outside [0.0, 1.0]", raw_score)))?;

    let harm_risk = level(object, "harmRisk")?;
    let feasibility = level(object, "feasibility")?;
    let quality = string(object, "quality")?;

    let stated_raw = string(object, "decision")?;
    let decision = Decision::from_wire(&stated_raw)
        .ok_or_else(|| invalid(format!("decision '{}' is not approve, flag or reject", stated_raw)))?;

    let reasoning = non_empty_string(object, "reasoning")?;

    let solution_scores = match content_type {
        ContentType::Solution => Some(solution_scores(object)?),
        _ => None,
    };

    let expected = alignment_score.band();
    if decision != expected {
        return Err(ClassifierError::ContractViolation {
            score: alignment_score.value(),
            stated: decision,
            expected,
        });
    }

    Ok(LayerBResult {
        aligned_domain,
        alignment_score,
        harm_risk,
        feasibility,
        quality,
        decision,
        reasoning,
        solution_scores,
    })
}

fn invalid(message: impl Into<String>) -> ClassifierError {
    ClassifierError::ResponseInvalid(message.into())
}

fn required<'a>(object: &'a Map<String, Value>, field: &str) -> Result<&'a Value, ClassifierError> {
    match object.get(field) {
        Some(Value::Null) | None => Err(invalid(format!("missing field '{}'", field))),
        Some(value) => Ok(value),
    }
}

fn string(object: &Map<String, Value>, field: &str) -> Result<String, ClassifierError> {
    required(object, field)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(format!("field '{}' must be a string", field)))
}

fn non_empty_string(object: &Map<String, Value>, field: &str) -> Result<String, ClassifierError> {
    let value = string(object, field)?;
    if value.trim().is_empty() {
        return Err(invalid(format!("field '{}' is empty", field)));
    }
    Ok(value)
}

fn level(object: &Map<String, Value>, field: &str) -> Result<Level, ClassifierError> {
    let raw = string(object, field)?;
    Level::from_wire(&raw)
        .ok_or_else(|| invalid(format!("field '{}' has unknown level '{}'", field, raw)))
}

fn solution_scores(object: &Map<String, Value>) -> Result<SolutionScores, ClassifierError> {
    let scores = required(object, "solutionScores")?
        .as_object()
        .ok_or_else(|| invalid("solutionScores must be an object"))?;

    Ok(SolutionScores {
        impact: sub_score(scores, "impact")?,
        feasibility: sub_score(scores, "feasibility")?,
        cost_efficiency: sub_score(scores, "costEfficiency")?,
    })
}

fn sub_score(scores: &Map<String, Value>, field: &str) -> Result<u8, ClassifierError> {
    let value = required(scores, field)
        .map_err(|_| invalid(format!("missing field 'solutionScores.{}'", field)))?;
    let score = value
        .as_u64()
        .ok_or_else(|| invalid(format!("solutionScores.{} must be a non-negative integer", field)))?;
    if score > MAX_SUB_SCORE {
        return Err(invalid(format!(
            "solutionScores.{} = {} exceeds {}",
            field, score, MAX_SUB_SCORE
        )));
    }
    Ok(score as u8)
}
