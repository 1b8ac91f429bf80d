//! Built-in rule-based tier analyzers.
//!
//! These are deliberately modest heuristics: each one turns a handful of
//! document checks into a TierScore. The aggregation core does not depend
//! on any of them being clever, only on the TierScore contract. Callers
//! with better domain analyzers swap them in through the
//! [`TierAnalyzer`](super::TierAnalyzer) seam.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::{AnalyzerError, TierAnalyzer};
use crate::core::input::{tokenize, ResumeDocument, SectionKind};
use crate::core::{Tier, TierScore};

static METRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+(?:\.\d+)?\s*%|[$€£]\s*\d|\b\d+x\b|\b\d{2,}\b").unwrap()
});

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\+?\d[\d\s().-]{7,}\d)").unwrap());

static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-•*]").unwrap());

static ACTION_VERB_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)^\s*[-•*]?\s*(developed|built|designed|implemented|created|led|managed|launched|delivered|improved|reduced|increased|optimized|automated|migrated|architected|deployed|shipped|mentored)\b",
    )
    .unwrap()
});

static SENIOR_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(senior|lead|principal|staff|architect)\b").unwrap());

static COMPETITIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(hackathon|award|winner|rank(ed)?|kaggle|leetcode|codeforces|acm|icpc|open[- ]source|contributor)\b").unwrap()
});

static VENDOR_CERT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(aws|azure|gcp|google cloud|cisco|oracle|pmp|scrum|kubernetes|terraform|databricks)\b").unwrap()
});

static COLLABORATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(teams?|cross[- ]functional|collaborat\w+|stakeholders?|partner(ed|ship)?|mentor(ed|ing)?)\b").unwrap()
});

static BUZZWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(synergy|passionate|hard[- ]?working|team player|detail[- ]oriented|go[- ]getter|self[- ]starter|results[- ]driven)\b").unwrap()
});

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "with", "you", "will", "our", "are", "have", "has", "this",
        "that", "from", "your", "who", "what", "can", "all", "able", "work", "working",
        "experience", "years", "year", "team", "strong", "skills", "knowledge", "plus",
        "required", "requirements", "preferred", "must", "should", "about", "role",
        "candidate", "ideal", "including", "etc", "not", "than", "more", "other", "well",
        "how", "within", "across", "their", "they", "them", "were", "was", "his", "her",
    ]
    .into_iter()
    .collect()
});

/// Extract the most frequent non-stopword terms from a job description.
/// Order is frequency-descending, ties broken by first appearance.
pub fn extract_jd_keywords(job_description: &str, limit: usize) -> Vec<String> {
    let tokens = tokenize(job_description);
    let mut order: Vec<String> = Vec::new();
    let mut counts: std::collections::HashMap<String, usize> = std::collections::HashMap::new();

    for token in tokens {
        if token.len() < 3 || STOPWORDS.contains(token.as_str()) || token.parse::<f64>().is_ok() {
            continue;
        }
        if !counts.contains_key(&token) {
            order.push(token.clone());
        }
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut ranked: Vec<(usize, String)> = order
        .into_iter()
        .enumerate()
        .map(|(first_seen, token)| {
            let count = counts[&token];
            (first_seen, token, count)
        })
        .map(|(first_seen, token, count)| (count * 10_000 - first_seen.min(9_999), token))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().take(limit).map(|(_, token)| token).collect()
}

/// The complete built-in analyzer set, one per weight-bearing tier.
pub fn default_analyzers() -> Vec<Box<dyn TierAnalyzer>> {
    vec![
        Box::new(ExperienceAnalyzer),
        Box::new(SkillsKeywordsAnalyzer),
        Box::new(ContentStructureAnalyzer),
        Box::new(BasicStructureAnalyzer),
        Box::new(ProjectsAnalyzer),
        Box::new(EducationAnalyzer),
        Box::new(CompetitiveAnalyzer),
        Box::new(CertificationsAnalyzer),
        Box::new(CultureFitAnalyzer),
        Box::new(QualitativeAnalyzer),
    ]
}

/// Fold a list of (passed, issue) checks into a TierScore.
fn score_from_checks(tier: Tier, checks: Vec<(bool, String)>) -> TierScore {
    let total = checks.len() as u32;
    let passed = checks.iter().filter(|(ok, _)| *ok).count() as u32;
    let issues: Vec<String> = checks
        .into_iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, issue)| issue)
        .collect();
    TierScore::new(tier, passed as f64, total.max(1) as f64, passed, total, issues)
}

pub struct ExperienceAnalyzer;

impl TierAnalyzer for ExperienceAnalyzer {
    fn tier(&self) -> Tier {
        Tier::Experience
    }

    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
        let entries = &doc.work_experience;
        let has_entries = !entries.is_empty();
        let has_dates = entries.iter().any(|e| e.start.is_some());
        let has_progression = entries.iter().any(|e| SENIOR_TITLE_RE.is_match(&e.title));
        let quantified = entries.iter().any(|e| METRIC_RE.is_match(&e.description));
        let described = entries
            .iter()
            .any(|e| tokenize(&e.description).len() >= 8);

        let checks = vec![
            (has_entries, "no work experience listed".to_string()),
            (has_dates, "work entries carry no dates".to_string()),
            (
                described,
                "work entries lack substantive descriptions".to_string(),
            ),
            (
                quantified,
                "no measurable outcomes in any work entry".to_string(),
            ),
            (
                has_progression,
                "no seniority progression visible in titles".to_string(),
            ),
        ];
        Ok(score_from_checks(self.tier(), checks))
    }
}

pub struct SkillsKeywordsAnalyzer;

impl TierAnalyzer for SkillsKeywordsAnalyzer {
    fn tier(&self) -> Tier {
        Tier::SkillsKeywords
    }

    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
        let words: HashSet<&str> = doc.words.iter().map(String::as_str).collect();
        let has_skills = !doc.skills.is_empty() || doc.has_section(SectionKind::Skills);
        let enough_skills = doc.skills.len() >= 5;
        let evidenced = !doc.skills.is_empty()
            && doc
                .skills
                .iter()
                .filter(|s| {
                    tokenize(s)
                        .iter()
                        .any(|token| words.contains(token.as_str()))
                })
                .count()
                * 2
                >= doc.skills.len();

        let mut checks = vec![
            (has_skills, "no skills section or skill list".to_string()),
            (enough_skills, "fewer than five skills listed".to_string()),
            (
                evidenced,
                "most listed skills have no supporting text".to_string(),
            ),
        ];

        if let Some(jd) = doc.job_description.as_deref() {
            let keywords = extract_jd_keywords(jd, 20);
            let covered = keywords
                .iter()
                .filter(|k| words.contains(k.as_str()))
                .count();
            let coverage = if keywords.is_empty() {
                1.0
            } else {
                covered as f64 / keywords.len() as f64
            };
            checks.push((
                coverage >= 0.5,
                "less than half of the job's keywords appear".to_string(),
            ));
            checks.push((
                coverage >= 0.75,
                "several role keywords are missing".to_string(),
            ));
        }

        Ok(score_from_checks(self.tier(), checks))
    }
}

pub struct ContentStructureAnalyzer;

impl TierAnalyzer for ContentStructureAnalyzer {
    fn tier(&self) -> Tier {
        Tier::ContentStructure
    }

    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
        let bullet_count = BULLET_RE.find_iter(&doc.text).count();
        let verb_led = ACTION_VERB_LINE_RE.find_iter(&doc.text).count();
        let word_count = doc.word_count();

        let checks = vec![
            (bullet_count >= 3, "content is not bulleted".to_string()),
            (
                bullet_count == 0 || verb_led * 10 >= bullet_count * 3,
                "bullets rarely open with an action verb".to_string(),
            ),
            (
                METRIC_RE.is_match(&doc.text),
                "no quantified results anywhere in the document".to_string(),
            ),
            (
                (150..=1200).contains(&word_count),
                format!("document length of {} words is outside 150-1200", word_count),
            ),
        ];
        Ok(score_from_checks(self.tier(), checks))
    }
}

pub struct BasicStructureAnalyzer;

impl TierAnalyzer for BasicStructureAnalyzer {
    fn tier(&self) -> Tier {
        Tier::BasicStructure
    }

    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
        let checks = vec![
            (
                EMAIL_RE.is_match(&doc.text),
                "no email address found".to_string(),
            ),
            (
                PHONE_RE.is_match(&doc.text),
                "no phone number found".to_string(),
            ),
            (
                doc.sections.len() >= 3,
                "fewer than three recognizable sections".to_string(),
            ),
            (
                doc.has_section(SectionKind::Experience) || doc.has_section(SectionKind::Projects),
                "neither an experience nor a projects section exists".to_string(),
            ),
        ];
        Ok(score_from_checks(self.tier(), checks))
    }
}

pub struct ProjectsAnalyzer;

impl TierAnalyzer for ProjectsAnalyzer {
    fn tier(&self) -> Tier {
        Tier::Projects
    }

    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
        let projects = &doc.projects;
        let checks = vec![
            (!projects.is_empty(), "no projects listed".to_string()),
            (
                projects.len() >= 2,
                "only one project listed".to_string(),
            ),
            (
                projects.iter().any(|p| !p.technologies.is_empty()),
                "projects name no technologies".to_string(),
            ),
            (
                projects
                    .iter()
                    .any(|p| tokenize(&p.description).len() >= 8),
                "project descriptions are too thin".to_string(),
            ),
            (
                projects.iter().any(|p| METRIC_RE.is_match(&p.description)),
                "no project states a measurable outcome".to_string(),
            ),
        ];
        Ok(score_from_checks(self.tier(), checks))
    }
}

pub struct EducationAnalyzer;

impl TierAnalyzer for EducationAnalyzer {
    fn tier(&self) -> Tier {
        Tier::Education
    }

    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
        let education = &doc.education;
        let checks = vec![
            (!education.is_empty(), "no education listed".to_string()),
            (
                education.iter().any(|e| !e.degree.trim().is_empty()),
                "education entries name no degree".to_string(),
            ),
            (
                education.iter().any(|e| !e.institution.trim().is_empty()),
                "education entries name no institution".to_string(),
            ),
            (
                education.iter().any(|e| e.year.is_some()),
                "education entries carry no year".to_string(),
            ),
        ];
        Ok(score_from_checks(self.tier(), checks))
    }
}

pub struct CompetitiveAnalyzer;

impl TierAnalyzer for CompetitiveAnalyzer {
    fn tier(&self) -> Tier {
        Tier::Competitive
    }

    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
        let mentions = COMPETITIVE_RE.find_iter(&doc.text).count();
        let checks = vec![
            (
                doc.has_section(SectionKind::Achievements) || mentions > 0,
                "no competitive or achievement signals".to_string(),
            ),
            (
                mentions >= 2,
                "competitive signals are sparse".to_string(),
            ),
        ];
        Ok(score_from_checks(self.tier(), checks))
    }
}

pub struct CertificationsAnalyzer;

impl TierAnalyzer for CertificationsAnalyzer {
    fn tier(&self) -> Tier {
        Tier::Certifications
    }

    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
        let certs = &doc.certifications;
        let checks = vec![
            (!certs.is_empty(), "no certifications listed".to_string()),
            (
                certs.iter().any(|c| VENDOR_CERT_RE.is_match(c)),
                "no recognized vendor certification".to_string(),
            ),
            (certs.len() >= 2, "only one certification".to_string()),
        ];
        Ok(score_from_checks(self.tier(), checks))
    }
}

pub struct CultureFitAnalyzer;

impl TierAnalyzer for CultureFitAnalyzer {
    fn tier(&self) -> Tier {
        Tier::CultureFit
    }

    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
        let collaboration = COLLABORATION_RE.find_iter(&doc.text).count();
        let checks = vec![
            (
                collaboration > 0,
                "no collaboration or teamwork signals".to_string(),
            ),
            (
                collaboration >= 3,
                "collaboration signals are sparse".to_string(),
            ),
        ];
        Ok(score_from_checks(self.tier(), checks))
    }
}

pub struct QualitativeAnalyzer;

impl TierAnalyzer for QualitativeAnalyzer {
    fn tier(&self) -> Tier {
        Tier::Qualitative
    }

    fn analyze(&self, doc: &ResumeDocument) -> Result<TierScore, AnalyzerError> {
        let buzzwords = BUZZWORD_RE.find_iter(&doc.text).count();
        let first_person = doc
            .words
            .iter()
            .filter(|w| w.as_str() == "i" || w.as_str() == "my")
            .count();
        let word_count = doc.word_count().max(1);

        let checks = vec![
            (
                doc.word_count() >= 100,
                "too little text to assess writing quality".to_string(),
            ),
            (
                buzzwords <= 2,
                format!("{} filler buzzwords found", buzzwords),
            ),
            (
                first_person * 50 < word_count,
                "heavy first-person phrasing".to_string(),
            ),
        ];
        Ok(score_from_checks(self.tier(), checks))
    }
}
