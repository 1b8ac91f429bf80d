//! End-to-end scenarios through the public engine API.

use indoc::indoc;
use resumap::core::input::{EducationEntry, ProjectEntry, RawWorkExperience, ResumeData};
use resumap::core::score_types::Score0To100;
use resumap::core::{RedFlagType, Severity, Tier, TierScore, TierScores};
use resumap::scoring::{
    aggregate, auto_reject_risk, map_score, normalize_weights, validate_occurrences,
    MatchBand, RoleProfile,
};
use resumap::{RawResumeInput as Input, RedFlag, ScoringConfig, ScoringEngine, WeightingMode};

fn engine() -> ScoringEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    ScoringEngine::new(ScoringConfig::default())
}

fn resume_text() -> String {
    indoc! {"
        Alex Rivera
        alex@example.com | +1 555 234 0011

        Summary
        Data platform engineer.

        Experience
        - Developed an ingestion service using Kafka, cutting latency by 40%
        - Reduced storage costs 25% by re-partitioning 300 datasets

        Skills
        Python, Kafka, Spark, Airflow, SQL

        Projects
        - Built a lineage tracker adopted by 12 teams

        Education
        BSc Statistics, City College, 2018
    "}
    .to_string()
}

fn structured_data() -> ResumeData {
    ResumeData {
        work_experience: vec![RawWorkExperience {
            title: "Data Engineer".into(),
            company: "Initech".into(),
            start: Some("2019-03".into()),
            end: Some("2023-06".into()),
            description: "Developed an ingestion service using Kafka, cutting latency by 40%"
                .into(),
        }],
        education: vec![EducationEntry {
            degree: "BSc Statistics".into(),
            institution: "City College".into(),
            year: Some("2018".into()),
        }],
        skills: vec![
            "Python".into(),
            "Kafka".into(),
            "Spark".into(),
            "Airflow".into(),
            "SQL".into(),
        ],
        projects: vec![ProjectEntry {
            name: "lineage tracker".into(),
            description: "Built a lineage tracker adopted by 12 teams".into(),
            technologies: vec!["Python".into()],
        }],
        certifications: vec![],
    }
}

// Scenario 1: empty resume text, no job description.
#[test]
fn empty_resume_is_capped_very_poor_and_auto_rejected() {
    let report = engine().score_blocking(Input {
        resume_text: String::new(),
        ..Default::default()
    });

    assert!(report.overall <= 35);
    assert_eq!(report.match_band, MatchBand::VeryPoor);
    assert!(report.auto_reject_risk);
    assert_eq!(report.weighting_mode, WeightingMode::General);
    // The degraded result still carries the full typed shape.
    assert_eq!(report.tier_scores.len(), 11);
    assert!((report.tier_scores.weight_sum() - 100.0).abs() < 1e-9);
}

// Scenario 2: no work experience, three projects, a degree => fresher weights.
#[test]
fn fresher_classification_redistributes_weights() {
    let mut data = structured_data();
    data.work_experience.clear();
    data.projects = (0..3)
        .map(|i| ProjectEntry {
            name: format!("project {}", i),
            description: "Built a tool adopted by 12 teams".into(),
            technologies: vec!["Python".into()],
        })
        .collect();

    let report = engine().score_blocking(Input {
        resume_text: resume_text(),
        resume_data: Some(data),
        ..Default::default()
    });

    let tiers = &report.tier_scores;
    assert_eq!(tiers.get(Tier::Experience).unwrap().weight, 0.0);
    assert_eq!(tiers.get(Tier::SkillsKeywords).unwrap().weight, 35.0);
    assert!((tiers.weight_sum() - 100.0).abs() < 1e-9);
}

// Scenario 3: three critical red flags regardless of tier scores.
#[test]
fn three_critical_flags_imply_auto_reject() {
    let critical = |id| {
        RedFlag::new(
            id,
            RedFlagType::Employment,
            Severity::Critical,
            15,
            "synthetic",
            "synthetic",
        )
    };
    let flags = vec![critical(1), critical(2), critical(3)];
    assert!(auto_reject_risk(&flags, 3));

    let two = vec![critical(1), critical(2)];
    assert!(!auto_reject_risk(&two, 3));
}

// Scenario 4: synthetic weighted score of exactly 68 with zero red flags.
#[test]
fn weighted_68_maps_to_good_match() {
    let mut tiers = TierScores::new();
    for tier in Tier::all() {
        tiers = tiers.insert(tier, TierScore::new(tier, 68.0, 100.0, 3, 5, vec![]));
    }
    let tiers = normalize_weights(&tiers, RoleProfile::Experienced);
    let aggregated = aggregate(&tiers, &[]);
    assert!((aggregated.final_score.value() - 68.0).abs() < 1e-9);

    let mapped = map_score(aggregated.final_score, aggregated.total_penalty, false);
    assert_eq!(mapped.match_band, MatchBand::Good);
    assert_eq!(mapped.interview_probability, "55-69%");
}

// Scenario 5: a bullet containing "python" twice is always stuffed.
#[test]
fn repeated_keyword_in_a_bullet_is_stuffed() {
    let bullet = "- Used python scripts and python jobs for reporting";
    let contexts = validate_occurrences("python", bullet, 0.15);
    assert_eq!(contexts.len(), 2);
    assert!(contexts.iter().all(|c| c.is_stuffed));
}

#[test]
fn overall_score_stays_in_bounds_across_input_shapes() {
    let inputs = vec![
        Input {
            resume_text: resume_text(),
            resume_data: Some(structured_data()),
            ..Default::default()
        },
        Input {
            resume_text: resume_text(),
            resume_data: None,
            job_description: Some("Senior data engineer, 5+ years, Kafka and Spark".into()),
            ..Default::default()
        },
        Input {
            resume_text: "short".into(),
            ..Default::default()
        },
    ];
    for input in inputs {
        let report = engine().score_blocking(input);
        assert!(report.overall <= 100);
        assert_eq!(report.tier_scores.len(), 11);
        assert!((report.tier_scores.weight_sum() - 100.0).abs() < 1e-9);
        assert!(report.red_flag_penalty <= 0.0);
    }
}

#[test]
fn jd_run_uses_jd_weighting_mode_and_reports_missing_keywords() {
    let report = engine().score_blocking(Input {
        resume_text: resume_text(),
        resume_data: Some(structured_data()),
        job_description: Some(
            "Looking for a data engineer. Kubernetes Kubernetes Kubernetes required. \
             Kafka, Spark, and dbt dbt experience expected."
                .into(),
        ),
        ..Default::default()
    });

    assert_eq!(report.weighting_mode, WeightingMode::Jd);
    let missing: Vec<&str> = report
        .missing_keywords_enhanced
        .iter()
        .map(|m| m.keyword.as_str())
        .collect();
    assert!(missing.contains(&"kubernetes"));
    assert!(missing.contains(&"dbt"));
    assert!(!missing.contains(&"kafka"));
}

#[test]
fn single_missing_critical_skill_obeys_the_15_percent_ceiling() {
    let base = engine().score_blocking(Input {
        resume_text: resume_text(),
        resume_data: Some(structured_data()),
        ..Default::default()
    });

    let with_missing = engine().score_blocking(Input {
        resume_text: resume_text(),
        resume_data: Some(structured_data()),
        job_description: Some(
            "Kafka Kafka Spark Spark Python Python Airflow SQL kubernetes kubernetes kubernetes"
                .into(),
        ),
        ..Default::default()
    });

    // The penalized run can differ for other reasons (JD mode literal
    // match), but the proportional penalty itself is bounded.
    assert!(with_missing.overall as f64 >= base.overall as f64 * 0.5);
    assert!(with_missing.overall <= 100);
}

#[test]
fn custom_failing_analyzer_degrades_instead_of_crashing() {
    use resumap::{AnalyzerError, TierAnalyzer};

    struct Panicky;
    impl TierAnalyzer for Panicky {
        fn tier(&self) -> Tier {
            Tier::SkillsKeywords
        }
        fn analyze(
            &self,
            _doc: &resumap::ResumeDocument,
        ) -> Result<TierScore, AnalyzerError> {
            Err(AnalyzerError::Failed {
                tier: Tier::SkillsKeywords,
                source: anyhow::anyhow!("backing service down"),
            })
        }
    }

    let mut analyzers = resumap::analyzers::default_analyzers();
    analyzers.retain(|a| a.tier() != Tier::SkillsKeywords);
    analyzers.push(Box::new(Panicky));

    let report = ScoringEngine::new(ScoringConfig::default())
        .with_analyzers(analyzers)
        .score_blocking(Input {
            resume_text: resume_text(),
            resume_data: Some(structured_data()),
            ..Default::default()
        });

    let skills = report.tier_scores.get(Tier::SkillsKeywords).unwrap();
    assert_eq!(skills.percentage, 20.0);
    // The stub still receives its profile weight.
    assert!(skills.weight > 0.0);
    assert!(skills.top_issues[0].contains("analyzer unavailable"));
    assert!(report.overall <= 100);
}

#[test]
fn semantic_timeout_does_not_abort_the_run() {
    use resumap::semantic::{SemanticMatcher, SimilarityFuture};
    use std::time::Duration;

    struct NeverResolves;
    impl SemanticMatcher for NeverResolves {
        fn similarity<'a>(&'a self, _r: &'a str, _j: &'a str) -> SimilarityFuture<'a> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(1.0)
            })
        }
    }

    let mut config = ScoringConfig::default();
    config.semantic_timeout_ms = 10;
    let report = ScoringEngine::new(config)
        .with_semantic(Box::new(NeverResolves))
        .score_blocking(Input {
            resume_text: resume_text(),
            resume_data: Some(structured_data()),
            job_description: Some("Data engineer with Kafka and Spark".into()),
            ..Default::default()
        });

    assert!(report.overall <= 100);
    assert!(report
        .confidence_breakdown
        .weaknesses
        .iter()
        .any(|w| w.contains("literal-only")));
}

#[test]
fn band_thresholds_match_the_published_table() {
    for (score, band) in [
        (95.0, MatchBand::Excellent),
        (85.0, MatchBand::VeryGood),
        (75.0, MatchBand::Good),
        (65.0, MatchBand::Fair),
        (55.0, MatchBand::BelowAverage),
        (45.0, MatchBand::Poor),
        (35.0, MatchBand::VeryPoor),
        (25.0, MatchBand::Inadequate),
        (5.0, MatchBand::Minimal),
    ] {
        assert_eq!(MatchBand::for_score(Score0To100::new(score)), band);
    }
}
