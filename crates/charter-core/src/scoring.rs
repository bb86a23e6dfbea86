//! Composite ranking score for solutions.
//!
//! | Sub-score | Weight |
//! |-----------|--------|
//! | impact | 0.40 |
//! | feasibility | 0.35 |
//! | costEfficiency | 0.25 |
//!
//! The composite ranks solutions that are already approved or flagged. It is
//! never an input to the moderation decision.

use charter_classifier::SolutionScores;

pub const IMPACT_WEIGHT: f64 = 0.40;
pub const FEASIBILITY_WEIGHT: f64 = 0.35;
pub const COST_EFFICIENCY_WEIGHT: f64 = 0.25;

/// Weighted blend of the three sub-scores, clamped to `[0, 100]`.
pub fn composite_score(scores: &SolutionScores) -> f64 {
    let raw = IMPACT_WEIGHT * f64::from(scores.impact)
        + FEASIBILITY_WEIGHT * f64::from(scores.feasibility)
        + COST_EFFICIENCY_WEIGHT * f64::from(scores.cost_efficiency);
    raw.clamp(0.0, 100.0)
}
