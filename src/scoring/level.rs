//! Candidate seniority detection.
//!
//! Classification precedence: an explicit user declaration always wins;
//! a job description demanding two or more years forces a non-fresher
//! result; otherwise the resume's own signals decide. The resume-only path
//! behaves identically whether or not a job description exists.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::input::{ResumeDocument, UserType, WorkEntry};
use crate::core::score_types::Score0To1;
use crate::core::{CandidateLevel, CandidateLevelResult};

static YEARS_REQUIRED_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(\d{1,2})\s*\+?\s*years?").unwrap(),
        Regex::new(r"(?i)minimum\s+(?:of\s+)?(\d{1,2})\s+years?").unwrap(),
        Regex::new(r"(?i)at\s+least\s+(\d{1,2})\s+years?").unwrap(),
    ]
});

static SENIOR_TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(senior|sr\.?|lead|principal|staff|architect|head|director|manager)\b")
        .unwrap()
});

/// Experience years required by a job description, if it states any.
/// When several figures appear, the largest wins.
pub fn required_years(job_description: &str) -> Option<u32> {
    let mut max_years: Option<u32> = None;
    for re in YEARS_REQUIRED_RES.iter() {
        for caps in re.captures_iter(job_description) {
            if let Ok(years) = caps[1].parse::<u32>() {
                max_years = Some(max_years.map_or(years, |m| m.max(years)));
            }
        }
    }
    max_years
}

/// Classify candidate seniority from the normalized document.
pub fn detect_candidate_level(doc: &ResumeDocument) -> CandidateLevelResult {
    // Explicit declaration always wins.
    match doc.user_type {
        Some(UserType::Fresher) | Some(UserType::Student) => {
            return CandidateLevelResult {
                level: CandidateLevel::Fresher,
                confidence: Score0To1::new(1.0),
                signals: vec!["explicitly declared fresher/student".to_string()],
            };
        }
        Some(UserType::Experienced) => {
            let (level, mut signals) = infer_from_resume(doc);
            signals.insert(0, "explicitly declared experienced".to_string());
            return CandidateLevelResult {
                level: level.max(CandidateLevel::Junior),
                confidence: Score0To1::new(1.0),
                signals,
            };
        }
        None => {}
    }

    let (mut level, mut signals) = infer_from_resume(doc);
    let mut confidence = 0.5 + 0.1 * signals.len() as f64;

    // A JD demanding years of experience overrides a fresher-looking resume.
    if let Some(years) = doc.job_description.as_deref().and_then(required_years) {
        if years >= 2 && level == CandidateLevel::Fresher {
            level = CandidateLevel::Junior;
            signals.push(format!(
                "job description requires {}+ years; forcing non-fresher",
                years
            ));
            confidence = (confidence - 0.1).max(0.3);
        }
    }

    CandidateLevelResult {
        level,
        confidence: Score0To1::new(confidence.min(0.95)),
        signals,
    }
}

fn infer_from_resume(doc: &ResumeDocument) -> (CandidateLevel, Vec<String>) {
    let mut signals = Vec::new();

    let full_roles = count_full_roles(&doc.work_experience);
    let internships = doc
        .work_experience
        .iter()
        .filter(|e| e.is_internship)
        .count();
    let estimated_years = estimate_years(full_roles);
    let has_senior_title = has_seniority_title(&doc.work_experience);

    if full_roles > 0 {
        signals.push(format!(
            "{} full work entr{} (~{} years estimated)",
            full_roles,
            if full_roles == 1 { "y" } else { "ies" },
            estimated_years
        ));
    }
    if internships > 0 {
        signals.push(format!("{} internship(s)", internships));
    }
    if has_senior_title {
        signals.push("seniority keyword in a role title".to_string());
    }
    if !doc.projects.is_empty() {
        signals.push(format!("{} listed project(s)", doc.projects.len()));
    }
    if !doc.education.is_empty() {
        signals.push(format!("{} education entr(ies)", doc.education.len()));
    }

    let level = classify(estimated_years, has_senior_title, full_roles);
    (level, signals)
}

// Years of experience estimated as twice the number of full (non-internship)
// work entries; resumes rarely carry reliable date spans for every role.
fn estimate_years(full_roles: usize) -> u32 {
    (full_roles * 2) as u32
}

fn count_full_roles(entries: &[WorkEntry]) -> usize {
    entries.iter().filter(|e| !e.is_internship).count()
}

fn has_seniority_title(entries: &[WorkEntry]) -> bool {
    entries.iter().any(|e| SENIOR_TITLE_RE.is_match(&e.title))
}

fn classify(estimated_years: u32, has_senior_title: bool, full_roles: usize) -> CandidateLevel {
    if full_roles == 0 {
        return CandidateLevel::Fresher;
    }
    if has_senior_title && estimated_years >= 5 {
        return CandidateLevel::Senior;
    }
    let by_years = match estimated_years {
        0..=2 => CandidateLevel::Junior,
        3..=6 => CandidateLevel::Mid,
        _ => CandidateLevel::Senior,
    };
    if has_senior_title {
        by_years.max(CandidateLevel::Mid)
    } else {
        by_years
    }
}
