//! The final result object.
//!
//! Field names here are a compatibility contract consumed by downstream
//! tooling; renaming any of them is a breaking change. The object must
//! survive a JSON round-trip with no loss, including the nested tier map
//! and critical metrics.

use serde::{Deserialize, Serialize};

use crate::core::input::ExtractionMode;
use crate::core::{CandidateLevelResult, RedFlag, Severity, TierScores};
use crate::scoring::band::MatchBand;
use crate::scoring::confidence::{ConfidenceBreakdown, ConfidenceLevel, WeightingMode};
use crate::scoring::critical_metrics::CriticalMetrics;

/// A job-description keyword the resume does not cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingKeyword {
    pub keyword: String,
    pub severity: Severity,
    pub suggestion: String,
}

/// The complete analysis result returned to callers.
///
/// Always fully populated: degraded runs express themselves through lower
/// scores, explicit issues, and warnings, never through absent fields or
/// surfaced errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Final calibrated score, 0-100.
    pub overall: u32,
    pub match_band: MatchBand,
    pub interview_probability_range: String,
    pub confidence: ConfidenceLevel,
    pub rubric_version: String,
    pub weighting_mode: WeightingMode,
    pub extraction_mode: ExtractionMode,
    /// Exactly the eleven fixed tier keys.
    pub tier_scores: TierScores,
    pub critical_metrics: CriticalMetrics,
    pub red_flags: Vec<RedFlag>,
    /// Sum of red-flag penalties, <= 0.
    pub red_flag_penalty: f64,
    pub auto_reject_risk: bool,
    pub missing_keywords_enhanced: Vec<MissingKeyword>,
    pub section_order_issues: Vec<String>,
    pub format_issues: Vec<String>,
    pub candidate_level: CandidateLevelResult,
    pub confidence_breakdown: ConfidenceBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::score_types::Score0To1;
    use crate::core::{CandidateLevel, RedFlagType, Tier, TierScore};
    use crate::scoring::confidence::ConfidenceComponents;
    use pretty_assertions::assert_eq;

    fn sample_report() -> AnalysisReport {
        let mut tiers = TierScores::new();
        for tier in Tier::all() {
            tiers = tiers.insert(
                tier,
                TierScore::new(tier, 68.0, 100.0, 3, 5, vec!["issue".into()]).with_weight(10.0),
            );
        }
        AnalysisReport {
            overall: 68,
            match_band: MatchBand::Good,
            interview_probability_range: "55-69%".into(),
            confidence: ConfidenceLevel::Medium,
            rubric_version: crate::config::RUBRIC_VERSION.into(),
            weighting_mode: WeightingMode::Jd,
            extraction_mode: ExtractionMode::Text,
            tier_scores: tiers,
            critical_metrics: CriticalMetrics {
                keyword_match: 4,
                technical_depth: 3,
                experience_relevance: 3,
                quantified_impact: 2,
                readability: 2,
                total_critical_score: 14,
            },
            red_flags: vec![RedFlag::new(
                101,
                RedFlagType::Employment,
                Severity::High,
                8,
                "gap",
                "explain it",
            )],
            red_flag_penalty: -8.0,
            auto_reject_risk: false,
            missing_keywords_enhanced: vec![MissingKeyword {
                keyword: "kubernetes".into(),
                severity: Severity::High,
                suggestion: "Mention kubernetes in a work or project bullet".into(),
            }],
            section_order_issues: vec!["education appears before experience".into()],
            format_issues: vec!["multi-column layout detected".into()],
            candidate_level: CandidateLevelResult {
                level: CandidateLevel::Mid,
                confidence: Score0To1::new(0.8),
                signals: vec!["2 full work entries".into()],
            },
            confidence_breakdown: ConfidenceBreakdown {
                numeric_score: 64,
                level: ConfidenceLevel::Medium,
                components: ConfidenceComponents {
                    literal_match: 18.0,
                    semantic_similarity: 15.0,
                    experience_relevancy: 14.0,
                    keyword_coverage: 9.0,
                    context_quality: 8.0,
                },
                reasoning: vec!["scored against the supplied job description".into()],
                strengths: vec!["strong literal keyword match (60%)".into()],
                weaknesses: vec![],
            },
        }
    }

    #[test]
    fn report_round_trips_through_json_losslessly() {
        let report = sample_report();
        let json = serde_json::to_string(&report).unwrap();
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }

    #[test]
    fn serialized_report_uses_the_contract_field_names() {
        let value = serde_json::to_value(sample_report()).unwrap();
        for field in [
            "overall",
            "match_band",
            "interview_probability_range",
            "confidence",
            "rubric_version",
            "weighting_mode",
            "extraction_mode",
            "tier_scores",
            "critical_metrics",
            "red_flags",
            "red_flag_penalty",
            "auto_reject_risk",
            "missing_keywords_enhanced",
            "section_order_issues",
            "format_issues",
        ] {
            assert!(value.get(field).is_some(), "missing contract field {}", field);
        }
        assert_eq!(value["match_band"], "Good Match");
        assert_eq!(value["weighting_mode"], "JD");
        assert_eq!(value["extraction_mode"], "TEXT");
        assert_eq!(value["red_flags"][0]["type"], "employment");
    }

    #[test]
    fn tier_scores_serialize_with_the_eleven_fixed_keys() {
        let value = serde_json::to_value(sample_report()).unwrap();
        let tier_map = value["tier_scores"].as_object().unwrap();
        assert_eq!(tier_map.len(), 11);
        for tier in Tier::all() {
            assert!(tier_map.contains_key(tier.key()), "missing tier {}", tier.key());
        }
        assert_eq!(
            value["critical_metrics"]["total_critical_score"],
            14
        );
    }
}
