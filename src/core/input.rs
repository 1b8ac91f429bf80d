//! Input model and the validation/normalization boundary.
//!
//! Raw input arrives from the document-processing side with almost every
//! field optional. It is converted exactly once, up front, into a
//! fully-populated [`ResumeDocument`] with documented defaults; everything
//! downstream assumes required fields exist and never reaches for
//! `Option` chains on individual accesses.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Explicit candidate-type declaration supplied by the user, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Fresher,
    Experienced,
    Student,
}

/// How the document text was extracted upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtractionMode {
    #[default]
    #[serde(rename = "TEXT")]
    Text,
    #[serde(rename = "OCR")]
    Ocr,
    #[serde(rename = "HYBRID")]
    Hybrid,
}

/// File-level metadata reported by the extraction stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub has_tables: bool,
    #[serde(default)]
    pub has_colors: bool,
    #[serde(default)]
    pub has_graphics: bool,
    #[serde(default)]
    pub has_multiple_columns: bool,
    #[serde(default)]
    pub extraction_mode: ExtractionMode,
}

/// One raw work-experience entry. Dates are free text ("2021-03",
/// "Mar 2021", "2021", "present").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWorkExperience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Structured resume fields, when the upstream parser produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(default)]
    pub work_experience: Vec<RawWorkExperience>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Everything the engine consumes for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResumeInput {
    pub resume_text: String,
    #[serde(default)]
    pub resume_data: Option<ResumeData>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub user_type: Option<UserType>,
    #[serde(default)]
    pub file_metadata: Option<FileMetadata>,
}

/// A work entry after normalization: dates parsed where parseable,
/// internship detection precomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub title: String,
    pub company: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub ongoing: bool,
    pub is_internship: bool,
    pub description: String,
}

impl WorkEntry {
    /// Tenure in whole months, when both endpoints parsed.
    pub fn tenure_months(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end >= start => {
                Some(end.signed_duration_since(start).num_days() / 30)
            }
            _ => None,
        }
    }
}

/// Resume section kinds recognized by the heading scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Achievements,
}

impl SectionKind {
    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Contact => "contact",
            SectionKind::Summary => "summary",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Skills => "skills",
            SectionKind::Projects => "projects",
            SectionKind::Certifications => "certifications",
            SectionKind::Achievements => "achievements",
        }
    }
}

/// A section heading found in the raw text, with the line it starts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSection {
    pub kind: SectionKind,
    pub line: usize,
}

/// The fully-populated internal document every downstream stage works on.
///
/// Constructed once by [`ResumeDocument::from_input`]; all collections
/// default to empty, the metadata defaults to [`FileMetadata::default`],
/// and the token/section views are precomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub text: String,
    /// Lowercased word tokens of the resume text.
    pub words: Vec<String>,
    pub sections: Vec<DetectedSection>,
    pub work_experience: Vec<WorkEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<String>,
    pub job_description: Option<String>,
    pub user_type: Option<UserType>,
    pub metadata: FileMetadata,
}

static SECTION_HEADINGS: Lazy<Vec<(SectionKind, Regex)>> = Lazy::new(|| {
    vec![
        (
            SectionKind::Contact,
            Regex::new(r"(?im)^\s*(contact|email|phone)\b").unwrap(),
        ),
        (
            SectionKind::Summary,
            Regex::new(r"(?im)^\s*(summary|objective|profile|about)\b").unwrap(),
        ),
        (
            SectionKind::Experience,
            Regex::new(r"(?im)^\s*((work|professional)\s+experience|experience|employment)\b")
                .unwrap(),
        ),
        (
            SectionKind::Education,
            Regex::new(r"(?im)^\s*(education|academic)\b").unwrap(),
        ),
        (
            SectionKind::Skills,
            Regex::new(r"(?im)^\s*((technical\s+)?skills|technologies)\b").unwrap(),
        ),
        (
            SectionKind::Projects,
            Regex::new(r"(?im)^\s*(projects?|personal\s+projects?)\b").unwrap(),
        ),
        (
            SectionKind::Certifications,
            Regex::new(r"(?im)^\s*(certifications?|licenses?)\b").unwrap(),
        ),
        (
            SectionKind::Achievements,
            Regex::new(r"(?im)^\s*(achievements?|awards?|honors?)\b").unwrap(),
        ),
    ]
});

static INTERNSHIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bintern(ship)?\b|\btrainee\b").unwrap());

static YEAR_MONTH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{1,2})$").unwrap());

static YEAR_ONLY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})$").unwrap());

static ONGOING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(present|current|now|ongoing)$").unwrap());

impl ResumeDocument {
    /// Normalize raw input into the internal document record.
    pub fn from_input(input: RawResumeInput) -> Self {
        let data = input.resume_data.unwrap_or_default();
        let words = tokenize(&input.resume_text);
        let sections = detect_sections(&input.resume_text);
        let work_experience = data
            .work_experience
            .into_iter()
            .map(normalize_work_entry)
            .collect();

        Self {
            words,
            sections,
            work_experience,
            education: data.education,
            skills: data.skills.into_iter().map(|s| s.trim().to_string()).collect(),
            projects: data.projects,
            certifications: data.certifications,
            job_description: input
                .job_description
                .filter(|jd| !jd.trim().is_empty()),
            user_type: input.user_type,
            metadata: input.file_metadata.unwrap_or_default(),
            text: input.resume_text,
        }
    }

    pub fn has_job_description(&self) -> bool {
        self.job_description.is_some()
    }

    /// Count of non-whitespace characters in the resume text.
    pub fn significant_chars(&self) -> usize {
        self.text.chars().filter(|c| !c.is_whitespace()).count()
    }

    /// Near-empty documents short-circuit the pipeline.
    pub fn is_near_empty(&self, min_significant_chars: usize) -> bool {
        self.significant_chars() < min_significant_chars
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }

    /// Sections in order of appearance in the text.
    pub fn section_order(&self) -> Vec<SectionKind> {
        let mut seen = Vec::new();
        for section in &self.sections {
            if !seen.contains(&section.kind) {
                seen.push(section.kind);
            }
        }
        seen
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

/// Lowercased word tokens; keeps alphanumerics plus `+`/`#` so tokens like
/// "c++" and "c#" survive.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect()
}

fn detect_sections(text: &str) -> Vec<DetectedSection> {
    let mut found = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        // Headings are short lines; skip body text that happens to start
        // with a section word.
        if line.trim().len() > 40 {
            continue;
        }
        for (kind, re) in SECTION_HEADINGS.iter() {
            if re.is_match(line) {
                found.push(DetectedSection {
                    kind: *kind,
                    line: line_idx,
                });
                break;
            }
        }
    }
    found
}

fn normalize_work_entry(raw: RawWorkExperience) -> WorkEntry {
    let ongoing = raw
        .end
        .as_deref()
        .map(|e| ONGOING_RE.is_match(e.trim()))
        .unwrap_or(false);
    let end = if ongoing {
        None
    } else {
        raw.end.as_deref().and_then(parse_fuzzy_date)
    };
    let is_internship =
        INTERNSHIP_RE.is_match(&raw.title) || INTERNSHIP_RE.is_match(&raw.description);

    WorkEntry {
        start: raw.start.as_deref().and_then(parse_fuzzy_date),
        end,
        ongoing,
        is_internship,
        title: raw.title,
        company: raw.company,
        description: raw.description,
    }
}

/// Parse the date formats resumes actually contain. Returns `None` on
/// anything unrecognized; callers treat missing dates as "unknown", never
/// as an error.
pub fn parse_fuzzy_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Some(caps) = YEAR_MONTH_RE.captures(trimmed) {
        let year: i32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, 1);
    }
    if let Some(caps) = YEAR_ONLY_RE.captures(trimmed) {
        let year: i32 = caps[1].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1);
    }
    // "Mar 2021" / "March 2021"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("01 {}", trimmed), "%d %b %Y") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("01 {}", trimmed), "%d %B %Y") {
        return Some(date);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn doc_from_text(text: &str) -> ResumeDocument {
        ResumeDocument::from_input(RawResumeInput {
            resume_text: text.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn tokenize_keeps_symbolic_skill_names() {
        let words = tokenize("Built services in C++ and C#, plus Python.");
        assert!(words.contains(&"c++".to_string()));
        assert!(words.contains(&"c#".to_string()));
        assert!(words.contains(&"python".to_string()));
    }

    #[test]
    fn near_empty_detection_ignores_whitespace() {
        let doc = doc_from_text("   \n\n  hi \t ");
        assert!(doc.is_near_empty(50));
        assert_eq!(doc.significant_chars(), 2);
    }

    #[test]
    fn detects_common_section_headings() {
        let doc = doc_from_text(indoc! {"
            Jane Doe
            Summary
            Backend engineer.

            Work Experience
            Acme Corp

            Education
            BSc Computer Science

            Technical Skills
            Rust, Python
        "});
        assert!(doc.has_section(SectionKind::Summary));
        assert!(doc.has_section(SectionKind::Experience));
        assert!(doc.has_section(SectionKind::Education));
        assert!(doc.has_section(SectionKind::Skills));
        assert_eq!(
            doc.section_order(),
            vec![
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills,
            ]
        );
    }

    #[test]
    fn long_body_lines_are_not_headings() {
        let doc = doc_from_text(
            "Experience building large distributed systems across many teams and regions",
        );
        assert!(!doc.has_section(SectionKind::Experience));
    }

    #[test]
    fn parses_resume_date_formats() {
        assert_eq!(
            parse_fuzzy_date("2021-03"),
            NaiveDate::from_ymd_opt(2021, 3, 1)
        );
        assert_eq!(
            parse_fuzzy_date("Mar 2021"),
            NaiveDate::from_ymd_opt(2021, 3, 1)
        );
        assert_eq!(
            parse_fuzzy_date("2019"),
            NaiveDate::from_ymd_opt(2019, 1, 1)
        );
        assert_eq!(parse_fuzzy_date("whenever"), None);
        assert_eq!(parse_fuzzy_date(""), None);
    }

    #[test]
    fn normalizes_ongoing_roles_and_internships() {
        let doc = ResumeDocument::from_input(RawResumeInput {
            resume_text: "text".into(),
            resume_data: Some(ResumeData {
                work_experience: vec![
                    RawWorkExperience {
                        title: "Software Engineering Intern".into(),
                        company: "Acme".into(),
                        start: Some("2022-06".into()),
                        end: Some("2022-09".into()),
                        ..Default::default()
                    },
                    RawWorkExperience {
                        title: "Backend Engineer".into(),
                        company: "Globex".into(),
                        start: Some("2023-01".into()),
                        end: Some("Present".into()),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }),
            ..Default::default()
        });

        assert!(doc.work_experience[0].is_internship);
        assert_eq!(doc.work_experience[0].tenure_months(), Some(3));
        assert!(doc.work_experience[1].ongoing);
        assert_eq!(doc.work_experience[1].end, None);
    }

    #[test]
    fn blank_job_description_normalizes_to_none() {
        let doc = ResumeDocument::from_input(RawResumeInput {
            resume_text: "text".into(),
            job_description: Some("   ".into()),
            ..Default::default()
        });
        assert!(!doc.has_job_description());
    }

    #[test]
    fn extraction_mode_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&ExtractionMode::Ocr).unwrap(),
            "\"OCR\""
        );
        assert_eq!(
            serde_json::to_string(&ExtractionMode::Text).unwrap(),
            "\"TEXT\""
        );
    }
}
