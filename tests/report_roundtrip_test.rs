//! JSON round-trip and contract-shape checks on the full result object.

use indoc::indoc;
use pretty_assertions::assert_eq;
use resumap::core::input::{EducationEntry, RawWorkExperience, ResumeData};
use resumap::core::Tier;
use resumap::{AnalysisReport, RawResumeInput, ScoringConfig, ScoringEngine};

fn scored_report() -> AnalysisReport {
    let engine = ScoringEngine::new(ScoringConfig::default());
    engine.score_blocking(RawResumeInput {
        resume_text: indoc! {"
            Sam Lee
            sam@example.com | +44 20 7946 0958

            Summary
            Platform engineer.

            Experience
            - Developed deployment tooling using Terraform, saving 200 hours a quarter

            Skills
            Terraform, Go, Kubernetes, Bash, Linux

            Education
            BEng Software Engineering, Tech University, 2017
        "}
        .to_string(),
        resume_data: Some(ResumeData {
            work_experience: vec![RawWorkExperience {
                title: "Platform Engineer".into(),
                company: "Hooli".into(),
                start: Some("2018-02".into()),
                end: Some("present".into()),
                description: "Developed deployment tooling using Terraform".into(),
            }],
            education: vec![EducationEntry {
                degree: "BEng Software Engineering".into(),
                institution: "Tech University".into(),
                year: Some("2017".into()),
            }],
            skills: vec![
                "Terraform".into(),
                "Go".into(),
                "Kubernetes".into(),
                "Bash".into(),
                "Linux".into(),
            ],
            ..Default::default()
        }),
        job_description: Some("Platform engineer, 3+ years Terraform and Kubernetes".into()),
        ..Default::default()
    })
}

#[test]
fn full_report_round_trips_without_loss() {
    let report = scored_report();
    let json = serde_json::to_string_pretty(&report).unwrap();
    let back: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report, back);
}

#[test]
fn serialized_tier_scores_carry_exactly_the_fixed_keys() {
    let value = serde_json::to_value(scored_report()).unwrap();
    let tiers = value["tier_scores"].as_object().unwrap();
    assert_eq!(tiers.len(), 11);
    for tier in Tier::all() {
        let entry = tiers
            .get(tier.key())
            .unwrap_or_else(|| panic!("missing tier key {}", tier.key()));
        assert!(entry.get("percentage").is_some());
        assert!(entry.get("weighted_contribution").is_some());
        assert!(entry.get("top_issues").is_some());
    }
}

#[test]
fn critical_metrics_total_survives_serialization() {
    let report = scored_report();
    let value = serde_json::to_value(&report).unwrap();
    let total = value["critical_metrics"]["total_critical_score"]
        .as_u64()
        .unwrap();
    assert_eq!(total, report.critical_metrics.total_critical_score as u64);
    assert!(total <= 19);
}

#[test]
fn contract_enum_strings_are_stable() {
    let value = serde_json::to_value(scored_report()).unwrap();
    let band = value["match_band"].as_str().unwrap();
    let known = [
        "Excellent Match",
        "Very Good Match",
        "Good Match",
        "Fair Match",
        "Below Average",
        "Poor Match",
        "Very Poor",
        "Inadequate",
        "Minimal Match",
    ];
    assert!(known.contains(&band));
    assert!(["High", "Medium", "Low"]
        .contains(&value["confidence"].as_str().unwrap()));
    assert_eq!(value["weighting_mode"], "JD");
    assert_eq!(value["extraction_mode"], "TEXT");
}

#[test]
fn empty_input_report_also_round_trips() {
    let engine = ScoringEngine::new(ScoringConfig::default());
    let report = engine.score_blocking(RawResumeInput::default());
    let json = serde_json::to_string(&report).unwrap();
    let back: AnalysisReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report, back);
    assert_eq!(
        serde_json::to_value(&report).unwrap()["tier_scores"]
            .as_object()
            .unwrap()
            .len(),
        11
    );
}
