//! Weighted score aggregation.
//!
//! The aggregator is the join point of the pipeline: it folds every tier's
//! weighted contribution (using each tier's *current* weight, so profile
//! redistribution actually takes effect), subtracts the red-flag penalty,
//! and clamps. A malformed tier contributes 0 and is logged; it never
//! aborts the run.

use serde::{Deserialize, Serialize};

use crate::core::score_types::Score0To100;
use crate::core::{RedFlag, TierScores};

/// Aggregation output consumed by the band mapper and the report builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    /// Sum of weighted tier contributions before penalties.
    pub weighted_score: f64,
    /// Sum of red-flag penalties, always <= 0.
    pub total_penalty: f64,
    /// Clamped final score.
    pub final_score: Score0To100,
}

/// Sum of red-flag penalties. Always <= 0 by [`RedFlag`] construction.
pub fn total_penalty(flags: &[RedFlag]) -> f64 {
    flags.iter().map(|f| f.penalty as f64).sum()
}

/// Fold tier contributions and the red-flag penalty into the final score.
pub fn aggregate(scores: &TierScores, flags: &[RedFlag]) -> AggregateScore {
    let weighted_score: f64 = scores
        .scored_iter()
        .map(|(tier, score)| {
            if score.weighted_contribution.is_finite() {
                score.weighted_contribution
            } else {
                log::warn!(
                    "tier {} produced a non-finite contribution; treating as 0",
                    tier.key()
                );
                0.0
            }
        })
        .sum();

    let penalty = total_penalty(flags);

    AggregateScore {
        weighted_score,
        total_penalty: penalty,
        final_score: Score0To100::new(weighted_score + penalty),
    }
}
