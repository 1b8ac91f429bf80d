//! Keyword context validation and stuffing detection.
//!
//! A keyword only counts as naturally used when its surroundings look like
//! real writing: an action verb opening the sentence, a measurable result
//! nearby, a contextual preposition close to the keyword. Repetition,
//! front-loading, and high keyword density mark an occurrence as stuffed,
//! independent of whether the keyword is "present".

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::ScoringConfig;
use crate::core::input::tokenize;

const BASE_CONTEXT_SCORE: f64 = 0.5;
const ACTION_VERB_BONUS: f64 = 0.2;
const METRIC_BONUS: f64 = 0.2;
const PREPOSITION_BONUS: f64 = 0.1;
/// Characters scanned around a keyword for a contextual preposition.
const PREPOSITION_WINDOW: usize = 30;
/// Lines with fewer words than this count as a "short span" for the
/// keywords-per-span rule.
const SHORT_SPAN_WORDS: usize = 15;

static ACTION_VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "developed", "built", "designed", "implemented", "created", "led", "managed",
        "launched", "delivered", "improved", "reduced", "increased", "optimized",
        "automated", "migrated", "architected", "maintained", "deployed", "established",
        "owned", "shipped", "mentored", "refactored", "scaled", "integrated",
    ]
    .into_iter()
    .collect()
});

static METRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+(?:\.\d+)?\s*%|[$€£]\s*\d|\b\d+x\b|\b\d{2,}\b").unwrap()
});

static PREPOSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(using|with|for|via|through|by|in|on|across|leveraging)\b").unwrap()
});

/// Where in the text an occurrence sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanPosition {
    Start,
    Middle,
    End,
}

/// One keyword occurrence with its context assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordContext {
    pub keyword: String,
    /// Text window around the occurrence.
    pub window: String,
    pub has_action_verb: bool,
    pub has_metric: bool,
    /// Context quality in [0, 1].
    pub context_score: f64,
    pub is_stuffed: bool,
    pub position: SpanPosition,
}

/// Aggregate stuffing assessment for one text against a keyword list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StuffingAnalysis {
    pub contexts: Vec<KeywordContext>,
    /// 0.5*(stuffed/N) + 0.3*(1 - avg context) + 0.2*(N / total words).
    pub stuffing_score: f64,
    pub is_stuffed: bool,
    /// Keyword occurrences beyond the per-short-span allowance.
    pub span_overflow: usize,
    /// Points to subtract, capped at 50.
    pub penalty: f64,
}

impl StuffingAnalysis {
    /// Mean context score across occurrences; `None` when nothing matched.
    pub fn average_context_score(&self) -> Option<f64> {
        if self.contexts.is_empty() {
            return None;
        }
        let sum: f64 = self.contexts.iter().map(|c| c.context_score).sum();
        Some(sum / self.contexts.len() as f64)
    }
}

/// Whether the text contains a number, percentage, or currency figure.
pub fn has_metric(text: &str) -> bool {
    METRIC_RE.is_match(text)
}

/// Validate every occurrence of `keyword` inside `text`.
pub fn validate_occurrences(
    keyword: &str,
    text: &str,
    density_limit: f64,
) -> Vec<KeywordContext> {
    let keyword = keyword.trim();
    if keyword.is_empty() || text.is_empty() {
        return Vec::new();
    }

    // Offsets are found in (and sliced from) the same lowercased copy;
    // lowercasing can change byte lengths, so the original must not be
    // indexed with them.
    let lower_text = text.to_lowercase();
    let lower_keyword = keyword.to_lowercase();
    let occurrences = find_occurrences(&lower_keyword, &lower_text);
    if occurrences.is_empty() {
        return Vec::new();
    }

    let total_words = tokenize(text).len().max(1);
    let keyword_words = tokenize(keyword).len().max(1);
    let density = (occurrences.len() * keyword_words) as f64 / total_words as f64;
    let duplicated = occurrences.len() > 1;

    occurrences
        .into_iter()
        .map(|offset| {
            assess_occurrence(keyword, &lower_text, offset, duplicated, density > density_limit)
        })
        .collect()
}

fn assess_occurrence(
    keyword: &str,
    text: &str,
    offset: usize,
    duplicated: bool,
    over_density: bool,
) -> KeywordContext {
    let sentence = sentence_at(text, offset);
    let has_action_verb = first_word_is_action_verb(sentence);
    let has_metric = METRIC_RE.is_match(sentence);
    let window = window_around(text, offset, keyword.len(), PREPOSITION_WINDOW);
    let has_preposition = PREPOSITION_RE.is_match(window);

    let mut context_score = BASE_CONTEXT_SCORE;
    if has_action_verb {
        context_score += ACTION_VERB_BONUS;
    }
    if has_metric {
        context_score += METRIC_BONUS;
    }
    if has_preposition {
        context_score += PREPOSITION_BONUS;
    }
    let context_score = context_score.min(1.0);

    let position = position_of(offset, text.len());
    let is_stuffed = (position == SpanPosition::Start && context_score < 0.6)
        || duplicated
        || over_density
        || context_score < 0.5;

    KeywordContext {
        keyword: keyword.to_string(),
        window: window.to_string(),
        has_action_verb,
        has_metric,
        context_score,
        is_stuffed,
        position,
    }
}

/// Aggregate stuffing analysis for a full text against the JD keyword set.
pub fn analyze_stuffing(
    keywords: &[String],
    text: &str,
    config: &ScoringConfig,
) -> StuffingAnalysis {
    let mut contexts = Vec::new();
    for keyword in keywords {
        contexts.extend(validate_occurrences(
            keyword,
            text,
            config.keyword_density_limit,
        ));
    }

    let total_words = tokenize(text).len().max(1);
    let n = contexts.len();
    let stuffing_score = if n == 0 {
        0.0
    } else {
        let stuffed = contexts.iter().filter(|c| c.is_stuffed).count();
        let avg_context: f64 =
            contexts.iter().map(|c| c.context_score).sum::<f64>() / n as f64;
        0.5 * (stuffed as f64 / n as f64)
            + 0.3 * (1.0 - avg_context)
            + 0.2 * (n as f64 / total_words as f64)
    };

    let span_overflow = short_span_overflow(keywords, text, config.max_keywords_per_span);

    let over_threshold = stuffing_score > config.stuffing_threshold;
    let is_stuffed = over_threshold || span_overflow > 0;
    let mut penalty = 0.0;
    if over_threshold {
        penalty += (stuffing_score - config.stuffing_threshold) * 50.0;
    }
    penalty += 10.0 * span_overflow as f64;
    let penalty = penalty.min(50.0);

    StuffingAnalysis {
        contexts,
        stuffing_score,
        is_stuffed,
        span_overflow,
        penalty,
    }
}

/// Keyword occurrences beyond the allowance, summed over short prose
/// lines. Comma-separated list lines (a skills section) are exempt; the
/// rule targets keywords crammed into sentences.
fn short_span_overflow(keywords: &[String], text: &str, max_per_span: usize) -> usize {
    text.lines()
        .filter(|line| {
            let words = tokenize(line).len();
            words > 0 && words < SHORT_SPAN_WORDS && line.matches(',').count() < 2
        })
        .map(|line| {
            let found: usize = keywords
                .iter()
                .map(|k| find_occurrences(k, line).len())
                .sum();
            found.saturating_sub(max_per_span)
        })
        .sum()
}

/// Byte offsets of whole-word, case-insensitive occurrences.
fn find_occurrences(keyword: &str, text: &str) -> Vec<usize> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Vec::new();
    }
    let lower_text = text.to_lowercase();
    let lower_keyword = keyword.to_lowercase();

    lower_text
        .match_indices(&lower_keyword)
        .filter(|(idx, matched)| {
            let before_ok = lower_text[..*idx]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
            let after_ok = lower_text[idx + matched.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
            before_ok && after_ok
        })
        .map(|(idx, _)| idx)
        .collect()
}

fn position_of(offset: usize, text_len: usize) -> SpanPosition {
    if text_len == 0 {
        return SpanPosition::Start;
    }
    let relative = offset as f64 / text_len as f64;
    if relative < 0.2 {
        SpanPosition::Start
    } else if relative > 0.8 {
        SpanPosition::End
    } else {
        SpanPosition::Middle
    }
}

/// The sentence (or bullet line) containing the given byte offset.
fn sentence_at(text: &str, offset: usize) -> &str {
    let bytes = text.as_bytes();
    let is_boundary = |b: u8| b == b'.' || b == b'!' || b == b'?' || b == b'\n';

    let mut start = offset.min(text.len());
    while start > 0 && !is_boundary(bytes[start - 1]) {
        start -= 1;
    }
    let mut end = offset.min(text.len());
    while end < text.len() && !is_boundary(bytes[end]) {
        end += 1;
    }
    // start/end sit on ASCII boundaries, so the slice is always valid.
    text[start..end].trim_start_matches(['-', '*', '•', ' ', '\t'])
}

fn first_word_is_action_verb(sentence: &str) -> bool {
    tokenize(sentence)
        .first()
        .map(|w| ACTION_VERBS.contains(w.as_str()))
        .unwrap_or(false)
}

/// A character-boundary-safe window of `pad` bytes around the occurrence.
fn window_around(text: &str, offset: usize, keyword_len: usize, pad: usize) -> &str {
    let mut start = offset.saturating_sub(pad);
    while start > 0 && !text.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (offset + keyword_len + pad).min(text.len());
    while end < text.len() && !text.is_char_boundary(end) {
        end += 1;
    }
    &text[start..end]
}
