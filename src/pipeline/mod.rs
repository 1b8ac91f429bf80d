//! Pipeline orchestration.
//!
//! One [`ScoringEngine`] invocation is purely functional over its input:
//! analyzers and red-flag detection fan out in parallel, the aggregation
//! stage joins them, and the band mapper and confidence calculator derive
//! presentation outputs independently. The engine is constructed
//! explicitly at the call site; there is no process-wide instance.

use crate::analyzers::{default_analyzers, run_analyzers, TierAnalyzer};
use crate::config::{ScoringConfig, RUBRIC_VERSION};
use crate::core::input::{RawResumeInput, ResumeDocument, SectionKind, UserType};
use crate::core::score_types::Score0To100;
use crate::core::{
    RedFlag, RedFlagType, Severity, Tier, TierScore, TierScores,
};
use crate::report::{AnalysisReport, MissingKeyword};
use crate::scoring::aggregator::{aggregate, AggregateScore};
use crate::scoring::band::MatchBand;
use crate::scoring::confidence::{
    calculate_confidence, ConfidenceFeatures, WeightingMode,
};
use crate::scoring::critical_metrics::CriticalMetrics;
use crate::scoring::keyword_context::{analyze_stuffing, has_metric, StuffingAnalysis};
use crate::scoring::level::detect_candidate_level;
use crate::scoring::penalty::{apply_penalties, PenaltySignal, PenaltyType};
use crate::scoring::red_flags::{auto_reject_risk, detect_red_flags};
use crate::scoring::weights::{normalize_weights, RoleProfile};
use crate::semantic::{similarity_with_timeout, SemanticMatcher};

use crate::analyzers::implementations::extract_jd_keywords;

/// Tier percentage pinned for every tier when the document is too empty
/// to analyze; lands the overall score in the "Very Poor" band.
const EMPTY_DOCUMENT_PERCENTAGE: f64 = 30.0;

/// JD keywords considered per run.
const JD_KEYWORD_LIMIT: usize = 20;
/// The first keywords by JD frequency count as critical.
const CRITICAL_KEYWORD_COUNT: usize = 5;

// Short-circuit flag ids.
const FLAG_EMPTY_DOCUMENT: u32 = 401;
const FLAG_NO_SKILL_CONTENT: u32 = 402;
const FLAG_NO_WORK_CONTENT: u32 = 403;

/// The scoring engine. Construct one per configuration and inject the
/// collaborators explicitly.
pub struct ScoringEngine {
    config: ScoringConfig,
    analyzers: Vec<Box<dyn TierAnalyzer>>,
    semantic: Option<Box<dyn SemanticMatcher>>,
}

impl ScoringEngine {
    /// Engine with the built-in analyzer set and no semantic matcher.
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            config,
            analyzers: default_analyzers(),
            semantic: None,
        }
    }

    /// Replace the analyzer set.
    pub fn with_analyzers(mut self, analyzers: Vec<Box<dyn TierAnalyzer>>) -> Self {
        self.analyzers = analyzers;
        self
    }

    /// Attach a semantic-similarity collaborator.
    pub fn with_semantic(mut self, matcher: Box<dyn SemanticMatcher>) -> Self {
        self.semantic = Some(matcher);
        self
    }

    /// Score one document. The only await point is the bounded semantic
    /// call; everything else is synchronous CPU work.
    pub async fn score(&self, input: RawResumeInput) -> AnalysisReport {
        let doc = ResumeDocument::from_input(input);
        if doc.is_near_empty(self.config.min_significant_chars) {
            return self.short_circuit(&doc);
        }

        let similarity = match (&self.semantic, doc.job_description.as_deref()) {
            (Some(matcher), Some(jd)) => {
                similarity_with_timeout(
                    matcher.as_ref(),
                    &doc.text,
                    jd,
                    self.config.semantic_timeout_ms,
                )
                .await
            }
            _ => None,
        };

        self.score_document(&doc, similarity)
    }

    /// Synchronous entry point. Spins up a minimal runtime only when a
    /// semantic matcher is attached; a runtime that fails to build
    /// degrades to literal-only scoring rather than erroring.
    pub fn score_blocking(&self, input: RawResumeInput) -> AnalysisReport {
        let doc = ResumeDocument::from_input(input);
        if doc.is_near_empty(self.config.min_significant_chars) {
            return self.short_circuit(&doc);
        }

        let similarity = match (&self.semantic, doc.job_description.as_deref()) {
            (Some(matcher), Some(jd)) => {
                match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(similarity_with_timeout(
                        matcher.as_ref(),
                        &doc.text,
                        jd,
                        self.config.semantic_timeout_ms,
                    )),
                    Err(error) => {
                        log::warn!("failed to build runtime for semantic call: {}", error);
                        None
                    }
                }
            }
            _ => None,
        };

        self.score_document(&doc, similarity)
    }

    fn score_document(
        &self,
        doc: &ResumeDocument,
        semantic_similarity: Option<f64>,
    ) -> AnalysisReport {
        // Fan-out: analyzers run in parallel; the red-flag detector and
        // keyword validation have no dependency on them.
        let raw_tiers = run_analyzers(&self.analyzers, doc, &self.config);
        let red_flags = detect_red_flags(doc, &self.config);

        let jd_keywords = doc
            .job_description
            .as_deref()
            .map(|jd| extract_jd_keywords(jd, JD_KEYWORD_LIMIT))
            .unwrap_or_default();
        let stuffing = if jd_keywords.is_empty() {
            analyze_stuffing(&doc.skills, &doc.text, &self.config)
        } else {
            analyze_stuffing(&jd_keywords, &doc.text, &self.config)
        };

        // Join barrier: everything below needs the full tier map.
        let level = detect_candidate_level(doc);
        let profile = RoleProfile::from_level(level.level);
        let tiers = normalize_weights(
            &with_penalty_tier(raw_tiers, &red_flags),
            profile,
        );

        let aggregated = aggregate(&tiers, &red_flags);

        let missing = missing_keywords(&jd_keywords, doc);
        let signals = penalty_signals(&missing, doc);
        let penalized = apply_penalties(
            aggregated.final_score.value(),
            &signals,
            self.config.global_penalty_cap,
        );
        let final_score =
            Score0To100::new(penalized.adjusted_score - stuffing.penalty);

        let auto_reject =
            auto_reject_risk(&red_flags, self.config.auto_reject_critical_threshold);
        let mapped = crate::scoring::band::map_score(
            final_score,
            aggregated.total_penalty,
            auto_reject,
        );

        let mode = if doc.has_job_description() {
            WeightingMode::Jd
        } else {
            WeightingMode::General
        };
        let quantified = has_metric(&doc.text);
        let features = confidence_features(
            doc,
            &tiers,
            &jd_keywords,
            &missing,
            semantic_similarity,
            &stuffing,
            quantified,
        );
        let confidence = calculate_confidence(&features, mode);

        let critical_metrics = CriticalMetrics::derive(
            &tiers,
            quantified,
            stuffing.average_context_score().unwrap_or(0.5),
        );

        AnalysisReport {
            overall: mapped.final_score.rounded(),
            match_band: mapped.match_band,
            interview_probability_range: mapped.interview_probability,
            confidence: confidence.level,
            rubric_version: RUBRIC_VERSION.to_string(),
            weighting_mode: mode,
            extraction_mode: doc.metadata.extraction_mode,
            tier_scores: tiers,
            critical_metrics,
            red_flags,
            red_flag_penalty: aggregated.total_penalty,
            auto_reject_risk: auto_reject,
            missing_keywords_enhanced: missing,
            section_order_issues: section_order_issues(doc, profile),
            format_issues: format_issues(doc),
            candidate_level: level,
            confidence_breakdown: confidence,
        }
    }

    /// A near-empty document never runs the full pipeline. The result is
    /// fully typed, pinned low, and names what is missing.
    fn short_circuit(&self, doc: &ResumeDocument) -> AnalysisReport {
        let level = detect_candidate_level(doc);
        let profile = RoleProfile::from_level(level.level);

        let mut tiers = TierScores::new();
        for tier in Tier::scored() {
            tiers = tiers.insert(
                tier,
                TierScore::new(
                    tier,
                    EMPTY_DOCUMENT_PERCENTAGE,
                    100.0,
                    0,
                    1,
                    vec!["document too short to analyze".to_string()],
                ),
            );
        }

        let red_flags = vec![
            RedFlag::new(
                FLAG_EMPTY_DOCUMENT,
                RedFlagType::Formatting,
                Severity::Critical,
                0,
                "resume text is empty or unreadable",
                "Upload a text-extractable resume",
            ),
            RedFlag::new(
                FLAG_NO_SKILL_CONTENT,
                RedFlagType::Skills,
                Severity::Critical,
                0,
                "no skills content found",
                "List the skills relevant to the role",
            ),
            RedFlag::new(
                FLAG_NO_WORK_CONTENT,
                RedFlagType::Employment,
                Severity::Critical,
                0,
                "no work history content found",
                "Describe work experience or projects",
            ),
        ];
        let tiers = normalize_weights(
            &with_penalty_tier(tiers, &red_flags),
            profile,
        );
        let aggregated: AggregateScore = aggregate(&tiers, &red_flags);

        let missing = doc
            .job_description
            .as_deref()
            .map(|jd| extract_jd_keywords(jd, JD_KEYWORD_LIMIT))
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(rank, keyword)| missing_keyword_entry(keyword, rank))
            .collect();

        let mode = if doc.has_job_description() {
            WeightingMode::Jd
        } else {
            WeightingMode::General
        };
        let features = ConfidenceFeatures {
            literal_match_percentage: 0.0,
            semantic_similarity: None,
            experience_relevancy_percentage: 0.0,
            missing_critical_keywords: 0,
            total_critical_keywords: 0,
            context_quality_score: 0.0,
            has_quantified_achievements: false,
            section_completeness: 0.0,
            formatting_score: 0.0,
        };
        let confidence = calculate_confidence(&features, mode);

        AnalysisReport {
            overall: aggregated.final_score.rounded(),
            match_band: MatchBand::for_score(aggregated.final_score),
            interview_probability_range: MatchBand::probability_range(aggregated.final_score)
                .to_string(),
            confidence: confidence.level,
            rubric_version: RUBRIC_VERSION.to_string(),
            weighting_mode: mode,
            extraction_mode: doc.metadata.extraction_mode,
            tier_scores: tiers,
            critical_metrics: CriticalMetrics::derive(&TierScores::new(), false, 0.0),
            red_flags,
            red_flag_penalty: 0.0,
            // Forced per the empty-input contract; with the default
            // threshold the three critical flags imply it anyway.
            auto_reject_risk: true,
            missing_keywords_enhanced: missing,
            section_order_issues: Vec::new(),
            format_issues: vec!["resume text is empty or too short to analyze".to_string()],
            candidate_level: level,
            confidence_breakdown: confidence,
        }
    }
}

/// Attach the penalty tier entry so the map always carries eleven keys.
fn with_penalty_tier(tiers: TierScores, red_flags: &[RedFlag]) -> TierScores {
    let magnitude: f64 = red_flags.iter().map(|f| f.penalty.abs() as f64).sum();
    let issues: Vec<String> = red_flags.iter().map(|f| f.description.clone()).collect();
    tiers.insert(
        Tier::RedFlags,
        TierScore::new(
            Tier::RedFlags,
            magnitude.min(100.0),
            100.0,
            0,
            red_flags.len() as u32,
            issues,
        ),
    )
}

fn missing_keyword_entry(keyword: String, rank: usize) -> MissingKeyword {
    let severity = if rank < CRITICAL_KEYWORD_COUNT {
        Severity::Critical
    } else {
        Severity::Low
    };
    MissingKeyword {
        suggestion: format!("Mention {} in a work or project bullet", keyword),
        keyword,
        severity,
    }
}

/// JD keywords absent from the resume token set, with critical ones first.
fn missing_keywords(jd_keywords: &[String], doc: &ResumeDocument) -> Vec<MissingKeyword> {
    let words: std::collections::HashSet<&str> =
        doc.words.iter().map(String::as_str).collect();
    jd_keywords
        .iter()
        .enumerate()
        .filter(|(_, keyword)| !words.contains(keyword.as_str()))
        .map(|(rank, keyword)| missing_keyword_entry(keyword.clone(), rank))
        .collect()
}

fn penalty_signals(missing: &[MissingKeyword], doc: &ResumeDocument) -> Vec<PenaltySignal> {
    let mut signals: Vec<PenaltySignal> = missing
        .iter()
        .map(|m| {
            let (penalty_type, severity) = match m.severity {
                Severity::Critical => (PenaltyType::MissingCriticalSkill, Severity::Critical),
                _ => (PenaltyType::MissingOptionalSkill, Severity::Low),
            };
            PenaltySignal::new(
                penalty_type,
                severity,
                format!("missing keyword {}", m.keyword),
            )
        })
        .collect();

    let undated = doc
        .work_experience
        .iter()
        .filter(|e| e.start.is_none())
        .count();
    if undated > 0 && !doc.work_experience.is_empty() {
        signals.push(PenaltySignal::new(
            PenaltyType::DateIssue,
            Severity::Medium,
            format!("{} work entr(ies) carry no start date", undated),
        ));
    }

    signals
}

#[allow(clippy::too_many_arguments)]
fn confidence_features(
    doc: &ResumeDocument,
    tiers: &TierScores,
    jd_keywords: &[String],
    missing: &[MissingKeyword],
    semantic_similarity: Option<f64>,
    stuffing: &StuffingAnalysis,
    quantified: bool,
) -> ConfidenceFeatures {
    let tier_pct = |tier: Tier| -> f64 {
        tiers
            .get(tier)
            .map(|t| if t.percentage.is_finite() { t.percentage } else { 0.0 })
            .unwrap_or(0.0)
    };

    let literal = if jd_keywords.is_empty() {
        // General mode: skill evidence stands in for literal JD matching.
        tier_pct(Tier::SkillsKeywords)
    } else {
        let covered = jd_keywords.len() - missing.len().min(jd_keywords.len());
        100.0 * covered as f64 / jd_keywords.len() as f64
    };

    let experience_relevancy = if tiers
        .get(Tier::Experience)
        .map(|t| t.weight > 0.0)
        .unwrap_or(false)
    {
        tier_pct(Tier::Experience)
    } else {
        tier_pct(Tier::Projects)
    };

    let total_critical = jd_keywords.len().min(CRITICAL_KEYWORD_COUNT) as u32;
    let missing_critical = missing
        .iter()
        .filter(|m| m.severity == Severity::Critical)
        .count() as u32;

    let expected_sections = [
        SectionKind::Summary,
        SectionKind::Skills,
        SectionKind::Education,
        SectionKind::Experience,
    ];
    let present = expected_sections
        .iter()
        .filter(|kind| {
            doc.has_section(**kind)
                || (**kind == SectionKind::Experience && doc.has_section(SectionKind::Projects))
        })
        .count();
    let section_completeness = 100.0 * present as f64 / expected_sections.len() as f64;

    ConfidenceFeatures {
        literal_match_percentage: literal,
        semantic_similarity,
        experience_relevancy_percentage: experience_relevancy,
        missing_critical_keywords: missing_critical,
        total_critical_keywords: total_critical,
        context_quality_score: stuffing
            .average_context_score()
            .map(|s| s * 100.0)
            .unwrap_or(50.0),
        has_quantified_achievements: quantified,
        section_completeness,
        formatting_score: tier_pct(Tier::BasicStructure),
    }
}

/// Conventional section order per profile; freshers lead with education
/// and projects, experienced candidates with work history.
fn expected_section_order(profile: RoleProfile) -> [SectionKind; 5] {
    match profile {
        RoleProfile::Fresher => [
            SectionKind::Summary,
            SectionKind::Education,
            SectionKind::Skills,
            SectionKind::Projects,
            SectionKind::Experience,
        ],
        RoleProfile::Experienced => [
            SectionKind::Summary,
            SectionKind::Experience,
            SectionKind::Skills,
            SectionKind::Projects,
            SectionKind::Education,
        ],
    }
}

fn section_order_issues(doc: &ResumeDocument, profile: RoleProfile) -> Vec<String> {
    let expected = expected_section_order(profile);
    let rank = |kind: SectionKind| expected.iter().position(|k| *k == kind);

    let detected: Vec<SectionKind> = doc
        .section_order()
        .into_iter()
        .filter(|kind| rank(*kind).is_some())
        .collect();

    let mut issues = Vec::new();
    for pair in detected.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        if rank(first) > rank(second) {
            issues.push(format!(
                "{} appears before {}; recruiters expect the reverse",
                first.label(),
                second.label()
            ));
        }
    }
    issues
}

fn format_issues(doc: &ResumeDocument) -> Vec<String> {
    let meta = &doc.metadata;
    let mut issues = Vec::new();
    if meta.has_multiple_columns {
        issues.push("multi-column layout may confuse resume parsers".to_string());
    }
    if meta.has_graphics {
        issues.push("embedded graphics are invisible to text screening".to_string());
    }
    if meta.has_tables {
        issues.push("tables often garble extracted text".to_string());
    }
    if let Some(pages) = meta.page_count {
        if pages > 3 {
            issues.push(format!("{} pages is longer than most screeners read", pages));
        }
    }
    if matches!(doc.user_type, Some(UserType::Fresher | UserType::Student))
        && meta.page_count.map(|p| p > 2).unwrap_or(false)
    {
        issues.push("fresher resumes should fit in one or two pages".to_string());
    }
    issues
}
