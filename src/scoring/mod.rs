//! Recommendation scoring.
//!
//! Fixed weighted rubric over enriched results: similarity 35, engagement
//! 25, followers 15, satisfaction 15, experience 10. Each component is
//! independently capped at its weight and the total is clamped to [0, 100].
//! The step functions are declarative `(cutoff, fraction)` tables evaluated
//! by one generic bucket function, so the rubric is testable and tunable in
//! one place. Pure functions, no I/O.

use serde::Serialize;

use crate::search::EnrichedResult;

pub const SIMILARITY_WEIGHT: f64 = 35.0;
pub const ENGAGEMENT_WEIGHT: f64 = 25.0;
pub const FOLLOWERS_WEIGHT: f64 = 15.0;
pub const SATISFACTION_WEIGHT: f64 = 15.0;
pub const EXPERIENCE_WEIGHT: f64 = 10.0;

/// One step of a bucket table: values past `cutoff` (strictly, unless
/// `inclusive`) earn `fraction` of the component weight.
#[derive(Debug, Clone, Copy)]
struct Step {
    cutoff: f64,
    inclusive: bool,
    fraction: f64,
}

const fn step(cutoff: f64, inclusive: bool, fraction: f64) -> Step {
    Step {
        cutoff,
        inclusive,
        fraction,
    }
}

/// Engagement rate (percent): >8 → 100%, >5 → 80%, >3 → 60%, ≥1.5 → 40%,
/// else nothing.
const ENGAGEMENT_STEPS: &[Step] = &[
    step(8.0, false, 1.0),
    step(5.0, false, 0.8),
    step(3.0, false, 0.6),
    step(1.5, true, 0.4),
];
const ENGAGEMENT_FLOOR: f64 = 0.0;

/// Follower count across the tier boundaries, 40–100% of the weight.
const FOLLOWER_STEPS: &[Step] = &[
    step(1_000_000.0, true, 1.0),
    step(500_000.0, true, 0.9),
    step(100_000.0, true, 0.8),
    step(50_000.0, true, 0.7),
    step(10_000.0, true, 0.6),
    step(1_000.0, true, 0.5),
];
const FOLLOWER_FLOOR: f64 = 0.4;

/// Collaboration count, 20–100% of the weight.
const EXPERIENCE_STEPS: &[Step] = &[
    step(50.0, true, 1.0),
    step(20.0, true, 0.8),
    step(10.0, true, 0.6),
    step(5.0, true, 0.4),
];
const EXPERIENCE_FLOOR: f64 = 0.2;

/// Per-component contribution, each already scaled to its weight.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScoreBreakdown {
    pub similarity: f64,
    pub engagement: f64,
    pub followers: f64,
    pub satisfaction: f64,
    pub experience: f64,
}

/// An enriched result plus its rubric score. Computed on demand, never
/// stored.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecommendation {
    pub result: EnrichedResult,
    pub total_score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Score one enriched result against the rubric.
pub fn score(result: &EnrichedResult) -> ScoredRecommendation {
    let creator = &result.creator;

    let breakdown = ScoreBreakdown {
        similarity: f64::from(result.combined_score).clamp(0.0, 1.0) * SIMILARITY_WEIGHT,
        engagement: bucket_fraction(creator.engagement_rate, ENGAGEMENT_STEPS, ENGAGEMENT_FLOOR)
            * ENGAGEMENT_WEIGHT,
        followers: bucket_fraction(creator.followers as f64, FOLLOWER_STEPS, FOLLOWER_FLOOR)
            * FOLLOWERS_WEIGHT,
        satisfaction: (creator.satisfaction.clamp(0.0, 5.0) / 5.0) * SATISFACTION_WEIGHT,
        experience: bucket_fraction(
            f64::from(creator.collaborations),
            EXPERIENCE_STEPS,
            EXPERIENCE_FLOOR,
        ) * EXPERIENCE_WEIGHT,
    };

    let total = breakdown.similarity
        + breakdown.engagement
        + breakdown.followers
        + breakdown.satisfaction
        + breakdown.experience;

    ScoredRecommendation {
        result: result.clone(),
        total_score: total.clamp(0.0, 100.0),
        breakdown,
    }
}

/// Score and rank a result list, highest first. The sort is stable, so
/// ties keep their input order.
pub fn rank(results: &[EnrichedResult]) -> Vec<ScoredRecommendation> {
    let mut scored: Vec<ScoredRecommendation> = results.iter().map(score).collect();
    scored.sort_by(|a, b| {
        b.total_score
            .partial_cmp(&a.total_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored
}

/// First matching step wins; tables are ordered highest cutoff first.
fn bucket_fraction(value: f64, steps: &[Step], floor: f64) -> f64 {
    for step in steps {
        let hit = if step.inclusive {
            value >= step.cutoff
        } else {
            value > step.cutoff
        };
        if hit {
            return step.fraction;
        }
    }
    floor
}
