//! The tier-analyzer seam and its failure boundary.
//!
//! Analyzers are independent, order-insensitive, and externally
//! replaceable. Each call is wrapped in an isolated failure boundary: an
//! analyzer that errors or returns malformed data is replaced by a
//! degraded stub score (fixed low percentage, zero initial weight) rather
//! than aborting the run. The weight normalizer later redistributes weight
//! onto the stub like any other tier, so a single failure measurably
//! lowers the final score without ever crashing the pipeline.

pub mod implementations;

use rayon::prelude::*;
use thiserror::Error;

use crate::config::ScoringConfig;
use crate::core::input::ResumeDocument;
use crate::core::{Tier, TierScore, TierScores};

pub use implementations::default_analyzers;

/// Why one analyzer's result was discarded.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("analyzer for tier {tier:?} returned malformed data: {reason}")]
    Malformed { tier: Tier, reason: String },
    #[error("analyzer for tier {tier:?} failed: {source}")]
    Failed {
        tier: Tier,
        #[source]
        source: anyhow::Error,
    },
}

/// One scored dimension of the document.
///
/// Implementations must be pure over their inputs; they run concurrently
/// under the fan-out runner.
pub trait TierAnalyzer: Send + Sync {
    fn tier(&self) -> Tier;
    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError>;
}

/// Check an analyzer's output against the TierScore invariants.
pub fn validate_tier_score(tier: Tier, score: TierScore) -> Result<TierScore, AnalyzerError> {
    let malformed = |reason: String| AnalyzerError::Malformed { tier, reason };

    if score.tier_number != tier.number() {
        return Err(malformed(format!(
            "tier number {} does not match {}",
            score.tier_number,
            tier.number()
        )));
    }
    if !score.max_score.is_finite() || score.max_score <= 0.0 {
        return Err(malformed(format!("max_score {} is not positive", score.max_score)));
    }
    if !score.score.is_finite() || score.score < 0.0 {
        return Err(malformed(format!("score {} is not a non-negative number", score.score)));
    }
    if !score.percentage.is_finite() {
        return Err(malformed("percentage is not finite".to_string()));
    }
    Ok(score)
}

/// The stand-in score for a failed analyzer.
pub fn degraded_stub(tier: Tier, percentage: f64, reason: &str) -> TierScore {
    TierScore::new(
        tier,
        percentage.clamp(0.0, 100.0),
        100.0,
        0,
        1,
        vec![format!("analyzer unavailable: {}", reason)],
    )
}

/// Run every analyzer over the document, in parallel, collecting a full
/// tier map. Failures become degraded stubs; this function never errors.
pub fn run_analyzers(
    analyzers: &[Box<dyn TierAnalyzer>],
    doc: &ResumeDocument,
    config: &ScoringConfig,
) -> TierScores {
    let results: Vec<(Tier, TierScore)> = analyzers
        .par_iter()
        .map(|analyzer| {
            let tier = analyzer.tier();
            let score = analyzer
                .analyze(doc)
                .and_then(|score| validate_tier_score(tier, score))
                .unwrap_or_else(|error| {
                    log::warn!("degrading tier {}: {}", tier.key(), error);
                    degraded_stub(tier, config.degraded_stub_percentage, &error.to_string())
                });
            (tier, score)
        })
        .collect();

    let mut scores = TierScores::new();
    for (tier, score) in results {
        scores = scores.insert(tier, score);
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::RawResumeInput;

    struct FixedAnalyzer {
        tier: Tier,
        percentage: f64,
    }

    impl TierAnalyzer for FixedAnalyzer {
        fn tier(&self) -> Tier {
            self.tier
        }
        fn analyze(&self, _doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
            Ok(TierScore::new(self.tier, self.percentage, 100.0, 1, 1, vec![]))
        }
    }

    struct FailingAnalyzer;

    impl TierAnalyzer for FailingAnalyzer {
        fn tier(&self) -> Tier {
            Tier::Projects
        }
        fn analyze(&self, _doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
            Err(AnalyzerError::Failed {
                tier: Tier::Projects,
                source: anyhow::anyhow!("synthetic failure"),
            })
        }
    }

    struct MalformedAnalyzer;

    impl TierAnalyzer for MalformedAnalyzer {
        fn tier(&self) -> Tier {
            Tier::Education
        }
        fn analyze(&self, _doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
            let mut score = TierScore::new(Tier::Education, 50.0, 100.0, 1, 1, vec![]);
            score.max_score = 0.0;
            Ok(score)
        }
    }

    fn empty_doc() -> ResumeDocument {
        ResumeDocument::from_input(RawResumeInput {
            resume_text: "text".into(),
            ..Default::default()
        })
    }

    #[test]
    fn failing_analyzer_is_replaced_by_a_degraded_stub() {
        let analyzers: Vec<Box<dyn TierAnalyzer>> = vec![
            Box::new(FixedAnalyzer {
                tier: Tier::SkillsKeywords,
                percentage: 80.0,
            }),
            Box::new(FailingAnalyzer),
        ];
        let scores = run_analyzers(&analyzers, &empty_doc(), &ScoringConfig::default());

        let projects = scores.get(Tier::Projects).unwrap();
        assert_eq!(projects.percentage, 20.0);
        assert_eq!(projects.weight, 0.0);
        assert!(projects.top_issues[0].contains("analyzer unavailable"));

        let skills = scores.get(Tier::SkillsKeywords).unwrap();
        assert_eq!(skills.percentage, 80.0);
    }

    #[test]
    fn malformed_output_is_caught_by_validation() {
        let analyzers: Vec<Box<dyn TierAnalyzer>> = vec![Box::new(MalformedAnalyzer)];
        let scores = run_analyzers(&analyzers, &empty_doc(), &ScoringConfig::default());
        let education = scores.get(Tier::Education).unwrap();
        assert_eq!(education.percentage, 20.0);
    }

    #[test]
    fn validation_rejects_mismatched_tier_numbers() {
        let score = TierScore::new(Tier::Projects, 10.0, 100.0, 1, 1, vec![]);
        assert!(validate_tier_score(Tier::Education, score).is_err());
    }

    #[test]
    fn validation_accepts_well_formed_scores() {
        let score = TierScore::new(Tier::Projects, 10.0, 100.0, 1, 1, vec![]);
        assert!(validate_tier_score(Tier::Projects, score).is_ok());
    }

    #[test]
    fn default_analyzer_set_covers_all_scored_tiers() {
        let analyzers = default_analyzers();
        let mut tiers: Vec<Tier> = analyzers.iter().map(|a| a.tier()).collect();
        tiers.sort();
        tiers.dedup();
        assert_eq!(tiers.len(), Tier::scored().len());
    }
}
