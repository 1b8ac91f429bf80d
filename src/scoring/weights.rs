//! Role-based tier weight tables and redistribution.
//!
//! Two profiles exist: fresher roles zero out the experience tier and push
//! its weight onto skills, projects, and education; experienced roles carry
//! the full experience weight. Each table sums to exactly 100 over the
//! non-penalty tiers, and redistribution re-derives every tier's weighted
//! contribution immediately.

use serde::{Deserialize, Serialize};

use crate::core::{CandidateLevel, Tier, TierScores};

/// The two weighting profiles. Candidate level maps onto these; the table
/// is the single authority for weights (no separate per-level pass).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleProfile {
    Fresher,
    Experienced,
}

impl RoleProfile {
    pub fn from_level(level: CandidateLevel) -> Self {
        match level {
            CandidateLevel::Fresher => RoleProfile::Fresher,
            CandidateLevel::Junior | CandidateLevel::Mid | CandidateLevel::Senior => {
                RoleProfile::Experienced
            }
        }
    }
}

/// Weight for one tier under one profile, in whole percent.
///
/// Integer tables keep the sum-to-100 invariant exact; there is no float
/// residue to chase.
pub fn weight_for(profile: RoleProfile, tier: Tier) -> f64 {
    let percent: u32 = match (profile, tier) {
        (RoleProfile::Fresher, Tier::Experience) => 0,
        (RoleProfile::Fresher, Tier::SkillsKeywords) => 35,
        (RoleProfile::Fresher, Tier::ContentStructure) => 12,
        (RoleProfile::Fresher, Tier::BasicStructure) => 10,
        (RoleProfile::Fresher, Tier::Projects) => 13,
        (RoleProfile::Fresher, Tier::Education) => 11,
        (RoleProfile::Fresher, Tier::Competitive) => 7,
        (RoleProfile::Fresher, Tier::Certifications) => 6,
        (RoleProfile::Fresher, Tier::CultureFit) => 3,
        (RoleProfile::Fresher, Tier::Qualitative) => 3,

        (RoleProfile::Experienced, Tier::Experience) => 25,
        (RoleProfile::Experienced, Tier::SkillsKeywords) => 25,
        (RoleProfile::Experienced, Tier::ContentStructure) => 10,
        (RoleProfile::Experienced, Tier::BasicStructure) => 8,
        (RoleProfile::Experienced, Tier::Projects) => 8,
        (RoleProfile::Experienced, Tier::Education) => 6,
        (RoleProfile::Experienced, Tier::Competitive) => 6,
        (RoleProfile::Experienced, Tier::Certifications) => 4,
        (RoleProfile::Experienced, Tier::CultureFit) => 4,
        (RoleProfile::Experienced, Tier::Qualitative) => 4,

        // The penalty tier never carries weight.
        (_, Tier::RedFlags) => 0,
    };
    percent as f64
}

/// Rewrite every tier's weight from the profile table, re-deriving each
/// weighted contribution. Idempotent: applying the same profile twice
/// yields an identical map.
pub fn normalize_weights(scores: &TierScores, profile: RoleProfile) -> TierScores {
    let mut normalized = scores.clone();
    for (tier, score) in scores.iter() {
        let weight = weight_for(profile, *tier);
        if !score.percentage.is_finite() {
            log::warn!(
                "tier {} has a non-finite percentage; contributing 0",
                tier.key()
            );
        }
        normalized = normalized.insert(*tier, score.clone().with_weight(weight));
    }
    normalized
}
