//! The "Big-5" critical metrics: five headline sub-scores summarized
//! separately from the tier breakdown. Each sub-score has a fixed ceiling
//! and the total is bounded at 19 by construction.

use serde::{Deserialize, Serialize};

use crate::core::{Tier, TierScores};

const KEYWORD_MATCH_MAX: u8 = 5;
const TECHNICAL_DEPTH_MAX: u8 = 4;
const EXPERIENCE_RELEVANCE_MAX: u8 = 4;
const QUANTIFIED_IMPACT_MAX: u8 = 3;
const READABILITY_MAX: u8 = 3;

/// Ceiling of `total_critical_score`.
pub const TOTAL_CRITICAL_MAX: u8 =
    KEYWORD_MATCH_MAX + TECHNICAL_DEPTH_MAX + EXPERIENCE_RELEVANCE_MAX
        + QUANTIFIED_IMPACT_MAX + READABILITY_MAX;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriticalMetrics {
    /// 0-5: how well JD keywords are covered.
    pub keyword_match: u8,
    /// 0-4: technical skill signal strength.
    pub technical_depth: u8,
    /// 0-4: relevance of work history (projects, for freshers).
    pub experience_relevance: u8,
    /// 0-3: quantified achievements present.
    pub quantified_impact: u8,
    /// 0-3: structure and readability.
    pub readability: u8,
    pub total_critical_score: u8,
}

impl CriticalMetrics {
    /// Derive the headline metrics from the tier results and the
    /// quantified-achievement signal.
    pub fn derive(
        tiers: &TierScores,
        has_quantified_achievements: bool,
        average_context_score: f64,
    ) -> Self {
        let keyword_match = scale(tier_percentage(tiers, Tier::SkillsKeywords), KEYWORD_MATCH_MAX);

        // Technical depth blends skill evidence with certifications and
        // competitive signals.
        let technical_pct = 0.6 * tier_percentage(tiers, Tier::SkillsKeywords)
            + 0.2 * tier_percentage(tiers, Tier::Certifications)
            + 0.2 * tier_percentage(tiers, Tier::Competitive);
        let technical_depth = scale(technical_pct, TECHNICAL_DEPTH_MAX);

        // A zero-weighted experience tier (fresher profile) falls back to
        // projects as the relevance signal.
        let experience_pct = if tier_weight(tiers, Tier::Experience) > 0.0 {
            tier_percentage(tiers, Tier::Experience)
        } else {
            tier_percentage(tiers, Tier::Projects)
        };
        let experience_relevance = scale(experience_pct, EXPERIENCE_RELEVANCE_MAX);

        let quantified_impact = if has_quantified_achievements {
            let context = average_context_score.clamp(0.0, 1.0);
            scale(context * 100.0, QUANTIFIED_IMPACT_MAX).max(1)
        } else {
            0
        };

        let readability_pct = 0.5 * tier_percentage(tiers, Tier::ContentStructure)
            + 0.5 * tier_percentage(tiers, Tier::BasicStructure);
        let readability = scale(readability_pct, READABILITY_MAX);

        let total_critical_score = keyword_match
            + technical_depth
            + experience_relevance
            + quantified_impact
            + readability;

        Self {
            keyword_match,
            technical_depth,
            experience_relevance,
            quantified_impact,
            readability,
            total_critical_score,
        }
    }
}

fn tier_percentage(tiers: &TierScores, tier: Tier) -> f64 {
    tiers
        .get(tier)
        .map(|t| if t.percentage.is_finite() { t.percentage } else { 0.0 })
        .unwrap_or(0.0)
}

fn tier_weight(tiers: &TierScores, tier: Tier) -> f64 {
    tiers.get(tier).map(|t| t.weight).unwrap_or(0.0)
}

/// Scale a 0-100 percentage onto a small integer ceiling.
fn scale(percentage: f64, max: u8) -> u8 {
    let clamped = percentage.clamp(0.0, 100.0);
    ((clamped / 100.0 * max as f64).round() as u8).min(max)
}
