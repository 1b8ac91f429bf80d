//! Core data model shared by every stage of the scoring pipeline.
//!
//! The central invariant lives here: a [`TierScore`]'s `percentage` and
//! `weighted_contribution` are always re-derived from `score`/`max_score`
//! and the current `weight` via the constructors on this type. Nothing
//! downstream mutates those fields directly, so they can never drift.

pub mod input;
pub mod score_types;

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::score_types::Score0To1;

/// The closed set of scored dimensions.
///
/// Ten tiers carry weight; `RedFlags` is the penalty tier and its weight is
/// pinned at zero. The ordering here is the canonical tier numbering used in
/// reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Experience,
    SkillsKeywords,
    ContentStructure,
    BasicStructure,
    Projects,
    Education,
    Competitive,
    Certifications,
    CultureFit,
    Qualitative,
    RedFlags,
}

impl Tier {
    /// All eleven tiers, in canonical order.
    pub fn all() -> [Tier; 11] {
        [
            Tier::Experience,
            Tier::SkillsKeywords,
            Tier::ContentStructure,
            Tier::BasicStructure,
            Tier::Projects,
            Tier::Education,
            Tier::Competitive,
            Tier::Certifications,
            Tier::CultureFit,
            Tier::Qualitative,
            Tier::RedFlags,
        ]
    }

    /// The ten weight-bearing tiers (everything except the penalty tier).
    pub fn scored() -> [Tier; 10] {
        [
            Tier::Experience,
            Tier::SkillsKeywords,
            Tier::ContentStructure,
            Tier::BasicStructure,
            Tier::Projects,
            Tier::Education,
            Tier::Competitive,
            Tier::Certifications,
            Tier::CultureFit,
            Tier::Qualitative,
        ]
    }

    /// Canonical 1-based tier number.
    pub fn number(self) -> u8 {
        match self {
            Tier::Experience => 1,
            Tier::SkillsKeywords => 2,
            Tier::ContentStructure => 3,
            Tier::BasicStructure => 4,
            Tier::Projects => 5,
            Tier::Education => 6,
            Tier::Competitive => 7,
            Tier::Certifications => 8,
            Tier::CultureFit => 9,
            Tier::Qualitative => 10,
            Tier::RedFlags => 11,
        }
    }

    /// Human-readable tier label for display.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Experience => "Work Experience",
            Tier::SkillsKeywords => "Skills & Keywords",
            Tier::ContentStructure => "Content Structure",
            Tier::BasicStructure => "Basic Structure",
            Tier::Projects => "Projects",
            Tier::Education => "Education",
            Tier::Competitive => "Competitive Signals",
            Tier::Certifications => "Certifications",
            Tier::CultureFit => "Culture Fit",
            Tier::Qualitative => "Qualitative Signals",
            Tier::RedFlags => "Red Flags",
        }
    }

    /// Snake-case key used in the serialized `tier_scores` object.
    pub fn key(self) -> &'static str {
        match self {
            Tier::Experience => "experience",
            Tier::SkillsKeywords => "skills_keywords",
            Tier::ContentStructure => "content_structure",
            Tier::BasicStructure => "basic_structure",
            Tier::Projects => "projects",
            Tier::Education => "education",
            Tier::Competitive => "competitive",
            Tier::Certifications => "certifications",
            Tier::CultureFit => "culture_fit",
            Tier::Qualitative => "qualitative",
            Tier::RedFlags => "red_flags",
        }
    }

    pub fn is_penalty_tier(self) -> bool {
        matches!(self, Tier::RedFlags)
    }
}

/// Maximum number of issue strings carried per tier.
pub const MAX_TOP_ISSUES: usize = 5;

/// One analyzer's structured output for a single tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierScore {
    pub tier_number: u8,
    pub tier_name: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub weight: f64,
    pub weighted_contribution: f64,
    pub metrics_passed: u32,
    pub metrics_total: u32,
    pub top_issues: Vec<String>,
}

impl TierScore {
    /// Build a tier score with `percentage` derived from `score`/`max_score`.
    ///
    /// A non-positive or non-finite `max_score` yields a 0.0 percentage
    /// rather than a NaN. Weight starts at zero; the weight normalizer
    /// assigns it. Issues beyond [`MAX_TOP_ISSUES`] are dropped.
    pub fn new(
        tier: Tier,
        score: f64,
        max_score: f64,
        metrics_passed: u32,
        metrics_total: u32,
        mut top_issues: Vec<String>,
    ) -> Self {
        top_issues.truncate(MAX_TOP_ISSUES);
        let percentage = derive_percentage(score, max_score);
        Self {
            tier_number: tier.number(),
            tier_name: tier.label().to_string(),
            score: if score.is_finite() { score.max(0.0) } else { 0.0 },
            max_score,
            percentage,
            weight: 0.0,
            weighted_contribution: 0.0,
            metrics_passed: metrics_passed.min(metrics_total),
            metrics_total,
            top_issues,
        }
    }

    /// Re-assign the weight, re-deriving `weighted_contribution`.
    ///
    /// A tier whose percentage is somehow non-finite contributes 0 instead
    /// of propagating the NaN into the weighted sum.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self.weighted_contribution = if self.percentage.is_finite() {
            self.percentage * weight / 100.0
        } else {
            0.0
        };
        self
    }
}

fn derive_percentage(score: f64, max_score: f64) -> f64 {
    if !score.is_finite() || !max_score.is_finite() || max_score <= 0.0 {
        return 0.0;
    }
    (100.0 * score / max_score).clamp(0.0, 100.0)
}

/// The full tier map keyed by the closed [`Tier`] set.
///
/// Backed by a persistent ordered map so weight redistribution produces a
/// new map without touching the analyzers' originals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TierScores(pub OrdMap<Tier, TierScore>);

impl TierScores {
    pub fn new() -> Self {
        Self(OrdMap::new())
    }

    pub fn insert(&self, tier: Tier, score: TierScore) -> Self {
        Self(self.0.update(tier, score))
    }

    pub fn get(&self, tier: Tier) -> Option<&TierScore> {
        self.0.get(&tier)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tier, &TierScore)> {
        self.0.iter()
    }

    /// Iterate the weight-bearing tiers only.
    pub fn scored_iter(&self) -> impl Iterator<Item = (&Tier, &TierScore)> {
        self.0.iter().filter(|(tier, _)| !tier.is_penalty_tier())
    }

    /// Sum of weights over the non-penalty tiers.
    pub fn weight_sum(&self) -> f64 {
        self.scored_iter().map(|(_, score)| score.weight).sum()
    }
}

/// Flag severity, ordered weakest to strongest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Category of a detected red flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedFlagType {
    Employment,
    Skills,
    Formatting,
}

/// A detected risk indicator that subtracts fixed penalty points
/// independent of tier weighting. Created once during detection;
/// immutable afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub id: u32,
    #[serde(rename = "type")]
    pub flag_type: RedFlagType,
    pub severity: Severity,
    /// Penalty points, always <= 0.
    pub penalty: i32,
    pub description: String,
    pub recommendation: String,
}

impl RedFlag {
    pub fn new(
        id: u32,
        flag_type: RedFlagType,
        severity: Severity,
        penalty: i32,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            id,
            flag_type,
            severity,
            // Detectors hand in point values; the sign convention is enforced here.
            penalty: -penalty.abs(),
            description: description.into(),
            recommendation: recommendation.into(),
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// Inferred candidate seniority, driving weight redistribution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CandidateLevel {
    Fresher,
    Junior,
    Mid,
    Senior,
}

impl CandidateLevel {
    pub fn label(self) -> &'static str {
        match self {
            CandidateLevel::Fresher => "fresher",
            CandidateLevel::Junior => "junior",
            CandidateLevel::Mid => "mid",
            CandidateLevel::Senior => "senior",
        }
    }
}

/// Seniority classification plus the evidence that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLevelResult {
    pub level: CandidateLevel,
    pub confidence: Score0To1,
    /// Ordered evidence strings, strongest signal first.
    pub signals: Vec<String>,
}
