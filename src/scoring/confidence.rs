//! Confidence calculation.
//!
//! Confidence estimates how trustworthy the score itself is, separately
//! from the score. Five independently-computed signals are blended with
//! fixed weights; the result also carries human-readable reasoning,
//! strengths, and weaknesses derived from threshold checks on the same
//! features (explanation only, never fed back into scoring).

use serde::{Deserialize, Serialize};

use crate::core::score_types::Score0To100;

const LITERAL_WEIGHT: f64 = 0.30;
const SEMANTIC_WEIGHT: f64 = 0.25;
const EXPERIENCE_WEIGHT: f64 = 0.20;
const COVERAGE_WEIGHT: f64 = 0.15;
const CONTEXT_WEIGHT: f64 = 0.10;

/// Flat boost applied in general (no-job-description) mode to reflect
/// looser matching criteria.
const GENERAL_MODE_BOOST: f64 = 5.0;

/// Which weighting regime the run used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightingMode {
    #[serde(rename = "JD")]
    Jd,
    #[serde(rename = "GENERAL")]
    General,
}

/// Coarse confidence label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    fn for_score(score: u32) -> Self {
        if score >= 80 {
            ConfidenceLevel::High
        } else if score >= 50 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Input features, each computed by a collaborator stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFeatures {
    /// Share of JD keywords literally present, 0-100.
    pub literal_match_percentage: f64,
    /// Embedding similarity in [0,1]; `None` when the collaborator timed
    /// out or failed (literal-only degraded mode).
    pub semantic_similarity: Option<f64>,
    /// How relevant the work history is to the target role, 0-100.
    pub experience_relevancy_percentage: f64,
    pub missing_critical_keywords: u32,
    pub total_critical_keywords: u32,
    /// Average keyword context quality, 0-100.
    pub context_quality_score: f64,
    pub has_quantified_achievements: bool,
    /// Share of expected resume sections present, 0-100.
    pub section_completeness: f64,
    /// Formatting tier percentage, 0-100.
    pub formatting_score: f64,
}

/// Per-component weighted contributions, for explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceComponents {
    pub literal_match: f64,
    pub semantic_similarity: f64,
    pub experience_relevancy: f64,
    pub keyword_coverage: f64,
    pub context_quality: f64,
}

/// Full confidence output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub numeric_score: u32,
    pub level: ConfidenceLevel,
    pub components: ConfidenceComponents,
    pub reasoning: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Blend the five signals into a 0-100 confidence score and label.
pub fn calculate_confidence(
    features: &ConfidenceFeatures,
    mode: WeightingMode,
) -> ConfidenceBreakdown {
    let literal = sanitize(features.literal_match_percentage);
    let semantic = features
        .semantic_similarity
        .filter(|s| s.is_finite())
        .map(|s| s.clamp(0.0, 1.0) * 100.0)
        .unwrap_or(0.0);
    let experience = sanitize(features.experience_relevancy_percentage);
    let coverage = keyword_coverage(
        features.missing_critical_keywords,
        features.total_critical_keywords,
    );
    let context = context_quality(features);

    let components = ConfidenceComponents {
        literal_match: literal * LITERAL_WEIGHT,
        semantic_similarity: semantic * SEMANTIC_WEIGHT,
        experience_relevancy: experience * EXPERIENCE_WEIGHT,
        keyword_coverage: coverage * COVERAGE_WEIGHT,
        context_quality: context * CONTEXT_WEIGHT,
    };

    let mut total = components.literal_match
        + components.semantic_similarity
        + components.experience_relevancy
        + components.keyword_coverage
        + components.context_quality;

    if mode == WeightingMode::General {
        total = (total + GENERAL_MODE_BOOST).min(100.0);
    }

    let numeric_score = Score0To100::new(total).rounded();
    let level = ConfidenceLevel::for_score(numeric_score);
    let (reasoning, strengths, weaknesses) =
        explain(features, mode, literal, coverage, numeric_score);

    ConfidenceBreakdown {
        numeric_score,
        level,
        components,
        reasoning,
        strengths,
        weaknesses,
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Coverage of critical keywords; a run with no critical keywords at all
/// gets a neutral 50 rather than a perfect score.
fn keyword_coverage(missing: u32, total: u32) -> f64 {
    if total == 0 {
        return 50.0;
    }
    let missing = missing.min(total);
    100.0 * (1.0 - missing as f64 / total as f64)
}

fn context_quality(features: &ConfidenceFeatures) -> f64 {
    let mut quality = sanitize(features.context_quality_score);
    if features.has_quantified_achievements {
        quality += 15.0;
    }
    quality += 0.10 * sanitize(features.section_completeness);
    quality += 0.10 * sanitize(features.formatting_score);
    quality.min(100.0)
}

fn explain(
    features: &ConfidenceFeatures,
    mode: WeightingMode,
    literal: f64,
    coverage: f64,
    numeric_score: u32,
) -> (Vec<String>, Vec<String>, Vec<String>) {
    let mut reasoning = Vec::new();
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    match mode {
        WeightingMode::General => reasoning.push(
            "scored in general mode; no job description to match against".to_string(),
        ),
        WeightingMode::Jd => {
            reasoning.push("scored against the supplied job description".to_string())
        }
    }
    reasoning.push(format!("confidence {} of 100", numeric_score));

    if literal >= 70.0 {
        strengths.push(format!("strong literal keyword match ({:.0}%)", literal));
    } else if literal < 40.0 {
        weaknesses.push(format!("weak literal keyword match ({:.0}%)", literal));
    }

    match features.semantic_similarity {
        Some(similarity) if similarity >= 0.7 => {
            strengths.push("high semantic similarity to the role".to_string())
        }
        Some(similarity) if similarity < 0.4 => {
            weaknesses.push("low semantic similarity to the role".to_string())
        }
        Some(_) => {}
        None => {
            reasoning.push(
                "semantic similarity unavailable; literal signals only".to_string(),
            );
            weaknesses.push("semantic matching degraded to literal-only".to_string());
        }
    }

    if features.experience_relevancy_percentage >= 70.0 {
        strengths.push("work history closely matches the target role".to_string());
    } else if features.experience_relevancy_percentage < 40.0 {
        weaknesses.push("work history is loosely related to the target role".to_string());
    }

    if features.total_critical_keywords > 0 {
        if coverage >= 80.0 {
            strengths.push("nearly all critical keywords are covered".to_string());
        } else if features.missing_critical_keywords * 2 > features.total_critical_keywords {
            weaknesses.push(format!(
                "{} of {} critical keywords missing",
                features.missing_critical_keywords, features.total_critical_keywords
            ));
        }
    }

    if features.has_quantified_achievements {
        strengths.push("achievements are quantified".to_string());
    } else {
        weaknesses.push("no quantified achievements found".to_string());
    }

    if features.section_completeness < 60.0 {
        weaknesses.push("resume is missing expected sections".to_string());
    }

    (reasoning, strengths, weaknesses)
}
