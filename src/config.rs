//! Engine configuration.
//!
//! Every tunable threshold lives here with a serde default, so a partial
//! `resumap.toml` override file only needs to name the fields it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Rubric version stamped into every report.
pub const RUBRIC_VERSION: &str = "2.4.1";

/// All engine thresholds and caps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum non-whitespace characters before the full pipeline runs.
    #[serde(default = "default_min_significant_chars")]
    pub min_significant_chars: usize,

    /// Critical red flags at or above this count set auto_reject_risk.
    #[serde(default = "default_auto_reject_threshold")]
    pub auto_reject_critical_threshold: usize,

    /// Total proportional-penalty reduction cap across one penalty run.
    #[serde(default = "default_global_penalty_cap")]
    pub global_penalty_cap: f64,

    /// Aggregate stuffing score above which a text is flagged stuffed.
    #[serde(default = "default_stuffing_threshold")]
    pub stuffing_threshold: f64,

    /// Keywords allowed in one short span before the per-span penalty kicks in.
    #[serde(default = "default_max_keywords_per_span")]
    pub max_keywords_per_span: usize,

    /// Keyword-word to total-word density above which an occurrence is stuffed.
    #[serde(default = "default_keyword_density_limit")]
    pub keyword_density_limit: f64,

    /// Bounded timeout for the semantic-similarity collaborator.
    #[serde(default = "default_semantic_timeout_ms")]
    pub semantic_timeout_ms: u64,

    /// Percentage assigned to a degraded stub when an analyzer fails.
    #[serde(default = "default_degraded_stub_percentage")]
    pub degraded_stub_percentage: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_significant_chars: default_min_significant_chars(),
            auto_reject_critical_threshold: default_auto_reject_threshold(),
            global_penalty_cap: default_global_penalty_cap(),
            stuffing_threshold: default_stuffing_threshold(),
            max_keywords_per_span: default_max_keywords_per_span(),
            keyword_density_limit: default_keyword_density_limit(),
            semantic_timeout_ms: default_semantic_timeout_ms(),
            degraded_stub_percentage: default_degraded_stub_percentage(),
        }
    }
}

impl ScoringConfig {
    /// Validate threshold sanity. Degenerate values are caught here, once,
    /// so the scoring stages never have to re-check them.
    pub fn validate(&self) -> Result<(), String> {
        if self.auto_reject_critical_threshold == 0 {
            return Err("auto_reject_critical_threshold must be at least 1".to_string());
        }
        if !(0.0..=100.0).contains(&self.global_penalty_cap) {
            return Err(format!(
                "global_penalty_cap must be within 0-100, got {}",
                self.global_penalty_cap
            ));
        }
        if !(0.0..=1.0).contains(&self.stuffing_threshold) {
            return Err(format!(
                "stuffing_threshold must be within 0.0-1.0, got {}",
                self.stuffing_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.keyword_density_limit) {
            return Err(format!(
                "keyword_density_limit must be within 0.0-1.0, got {}",
                self.keyword_density_limit
            ));
        }
        if !(0.0..=100.0).contains(&self.degraded_stub_percentage) {
            return Err(format!(
                "degraded_stub_percentage must be within 0-100, got {}",
                self.degraded_stub_percentage
            ));
        }
        Ok(())
    }

    /// Load a config override file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        let config: ScoringConfig = toml::from_str(&content)
            .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Look for `resumap.toml` in `dir` and its ancestors; fall back to
    /// defaults when none exists.
    pub fn discover(dir: &Path) -> Self {
        let mut current = Some(dir);
        while let Some(candidate_dir) = current {
            let candidate = candidate_dir.join("resumap.toml");
            if candidate.is_file() {
                match Self::from_file(&candidate) {
                    Ok(config) => return config,
                    Err(e) => {
                        log::warn!("ignoring invalid config {}: {}", candidate.display(), e);
                        return Self::default();
                    }
                }
            }
            current = candidate_dir.parent();
        }
        Self::default()
    }
}

fn default_min_significant_chars() -> usize {
    50
}

fn default_auto_reject_threshold() -> usize {
    3
}

fn default_global_penalty_cap() -> f64 {
    15.0
}

fn default_stuffing_threshold() -> f64 {
    0.6
}

fn default_max_keywords_per_span() -> usize {
    2
}

fn default_keyword_density_limit() -> f64 {
    0.15
}

fn default_semantic_timeout_ms() -> u64 {
    2000
}

fn default_degraded_stub_percentage() -> f64 {
    20.0
}
