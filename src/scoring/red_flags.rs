//! Red-flag detection and the auto-reject rule.
//!
//! Red flags subtract fixed penalty points independent of tier weighting.
//! The aggregation core only relies on the contract (penalties <= 0,
//! auto-reject at a critical-count threshold); the rule set here is the
//! built-in detector covering the three flag categories.

use crate::config::ScoringConfig;
use crate::core::input::{ResumeDocument, ExtractionMode, WorkEntry};
use crate::core::{RedFlag, RedFlagType, Severity};

// Stable flag ids, grouped by category.
const FLAG_EMPLOYMENT_GAP: u32 = 101;
const FLAG_SHORT_TENURE: u32 = 102;
const FLAG_UNEVIDENCED_SKILLS: u32 = 201;
const FLAG_SKILL_OVERLOAD: u32 = 202;
const FLAG_PAGE_COUNT: u32 = 301;
const FLAG_OCR_TABLES: u32 = 302;
const FLAG_MULTI_COLUMN: u32 = 303;

/// Months of unexplained gap between consecutive roles before flagging.
const GAP_MONTHS_THRESHOLD: i64 = 6;
/// Months of gap that escalate the flag to critical.
const GAP_MONTHS_CRITICAL: i64 = 24;
/// Average tenure below this (months) across multiple roles gets flagged.
const SHORT_TENURE_MONTHS: i64 = 12;
/// Skill lists longer than this read as a laundry list.
const SKILL_OVERLOAD_COUNT: usize = 25;
/// Pages beyond this get flagged.
const PAGE_COUNT_LIMIT: u32 = 3;

/// Default penalty points per severity.
pub fn default_penalty(severity: Severity) -> i32 {
    match severity {
        Severity::Critical => 15,
        Severity::High => 8,
        Severity::Medium => 5,
        Severity::Low => 2,
    }
}

/// Count of critical flags.
pub fn critical_count(flags: &[RedFlag]) -> usize {
    flags.iter().filter(|f| f.is_critical()).count()
}

/// Auto-reject when critical flags reach the configured threshold.
pub fn auto_reject_risk(flags: &[RedFlag], threshold: usize) -> bool {
    critical_count(flags) >= threshold
}

/// Run the built-in rule set over a normalized document.
pub fn detect_red_flags(doc: &ResumeDocument, _config: &ScoringConfig) -> Vec<RedFlag> {
    let mut flags = Vec::new();
    detect_employment_flags(&doc.work_experience, &mut flags);
    detect_skill_flags(doc, &mut flags);
    detect_formatting_flags(doc, &mut flags);
    flags
}

fn detect_employment_flags(entries: &[WorkEntry], flags: &mut Vec<RedFlag>) {
    let mut dated: Vec<&WorkEntry> = entries
        .iter()
        .filter(|e| e.start.is_some() && (e.end.is_some() || e.ongoing))
        .collect();
    dated.sort_by_key(|e| e.start);

    for pair in dated.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        let (Some(end), Some(next_start)) = (earlier.end, later.start) else {
            continue;
        };
        let gap_months = next_start.signed_duration_since(end).num_days() / 30;
        if gap_months > GAP_MONTHS_THRESHOLD {
            let severity = if gap_months > GAP_MONTHS_CRITICAL {
                Severity::Critical
            } else {
                Severity::High
            };
            flags.push(RedFlag::new(
                FLAG_EMPLOYMENT_GAP,
                RedFlagType::Employment,
                severity,
                default_penalty(severity),
                format!(
                    "{} month employment gap before joining {}",
                    gap_months, later.company
                ),
                "Explain the gap (study, sabbatical, family) directly on the resume",
            ));
        }
    }

    let tenures: Vec<i64> = dated.iter().filter_map(|e| e.tenure_months()).collect();
    if tenures.len() >= 2 {
        let average = tenures.iter().sum::<i64>() / tenures.len() as i64;
        if average < SHORT_TENURE_MONTHS {
            flags.push(RedFlag::new(
                FLAG_SHORT_TENURE,
                RedFlagType::Employment,
                Severity::Medium,
                default_penalty(Severity::Medium),
                format!("average tenure of {} months across roles", average),
                "Group short contract roles together to show continuity",
            ));
        }
    }
}

fn detect_skill_flags(doc: &ResumeDocument, flags: &mut Vec<RedFlag>) {
    if doc.skills.is_empty() {
        return;
    }

    let lower_text = doc.text.to_lowercase();
    let unevidenced = doc
        .skills
        .iter()
        .filter(|skill| {
            let needle = skill.to_lowercase();
            !needle.is_empty() && !lower_text.contains(&needle)
        })
        .count();

    if unevidenced * 2 > doc.skills.len() {
        flags.push(RedFlag::new(
            FLAG_UNEVIDENCED_SKILLS,
            RedFlagType::Skills,
            Severity::High,
            default_penalty(Severity::High),
            format!(
                "{} of {} listed skills never appear in the resume body",
                unevidenced,
                doc.skills.len()
            ),
            "Back each claimed skill with a project or work bullet",
        ));
    }

    if doc.skills.len() > SKILL_OVERLOAD_COUNT {
        flags.push(RedFlag::new(
            FLAG_SKILL_OVERLOAD,
            RedFlagType::Skills,
            Severity::Medium,
            default_penalty(Severity::Medium),
            format!("{} skills listed; reads as a laundry list", doc.skills.len()),
            "Trim the skill list to what the target role needs",
        ));
    }
}

fn detect_formatting_flags(doc: &ResumeDocument, flags: &mut Vec<RedFlag>) {
    let meta = &doc.metadata;

    if let Some(pages) = meta.page_count {
        if pages > PAGE_COUNT_LIMIT {
            flags.push(RedFlag::new(
                FLAG_PAGE_COUNT,
                RedFlagType::Formatting,
                Severity::Medium,
                default_penalty(Severity::Medium),
                format!("resume runs {} pages", pages),
                "Condense to at most two or three pages",
            ));
        }
    }

    if meta.has_tables && meta.extraction_mode == ExtractionMode::Ocr {
        flags.push(RedFlag::new(
            FLAG_OCR_TABLES,
            RedFlagType::Formatting,
            Severity::High,
            default_penalty(Severity::High),
            "tables in an OCR-extracted document; parsing is unreliable",
            "Use a simple single-column text layout",
        ));
    }

    if meta.has_multiple_columns {
        flags.push(RedFlag::new(
            FLAG_MULTI_COLUMN,
            RedFlagType::Formatting,
            Severity::Low,
            default_penalty(Severity::Low),
            "multi-column layout detected",
            "Prefer a single-column layout for reliable parsing",
        ));
    }
}
