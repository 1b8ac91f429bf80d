//! Score-to-band mapping.
//!
//! A deterministic step function evaluated high-to-low, first match wins.
//! Bands are ordered, so a strictly higher score can never map to a
//! strictly worse band.

use serde::{Deserialize, Serialize};

use crate::core::score_types::Score0To100;

/// The nine ordered match bands, best first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MatchBand {
    #[serde(rename = "Excellent Match")]
    Excellent,
    #[serde(rename = "Very Good Match")]
    VeryGood,
    #[serde(rename = "Good Match")]
    Good,
    #[serde(rename = "Fair Match")]
    Fair,
    #[serde(rename = "Below Average")]
    BelowAverage,
    #[serde(rename = "Poor Match")]
    Poor,
    #[serde(rename = "Very Poor")]
    VeryPoor,
    #[serde(rename = "Inadequate")]
    Inadequate,
    #[serde(rename = "Minimal Match")]
    Minimal,
}

impl MatchBand {
    /// Threshold table, best band first. First row whose threshold the
    /// score meets wins.
    const LADDER: [(f64, MatchBand, &'static str); 9] = [
        (90.0, MatchBand::Excellent, "85-100%"),
        (80.0, MatchBand::VeryGood, "70-84%"),
        (70.0, MatchBand::Good, "55-69%"),
        (60.0, MatchBand::Fair, "35-54%"),
        (50.0, MatchBand::BelowAverage, "20-34%"),
        (40.0, MatchBand::Poor, "8-19%"),
        (30.0, MatchBand::VeryPoor, "3-7%"),
        (20.0, MatchBand::Inadequate, "1-2%"),
        (0.0, MatchBand::Minimal, "0-0.5%"),
    ];

    pub fn for_score(score: Score0To100) -> MatchBand {
        Self::row_for(score).1
    }

    /// Interview-probability range for the band a score falls in.
    pub fn probability_range(score: Score0To100) -> &'static str {
        Self::row_for(score).2
    }

    fn row_for(score: Score0To100) -> (f64, MatchBand, &'static str) {
        let value = score.value();
        for row in Self::LADDER {
            if value >= row.0 {
                return row;
            }
        }
        // Score0To100 can't go below 0, so the 0.0 row always matched.
        Self::LADDER[8]
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchBand::Excellent => "Excellent Match",
            MatchBand::VeryGood => "Very Good Match",
            MatchBand::Good => "Good Match",
            MatchBand::Fair => "Fair Match",
            MatchBand::BelowAverage => "Below Average",
            MatchBand::Poor => "Poor Match",
            MatchBand::VeryPoor => "Very Poor",
            MatchBand::Inadequate => "Inadequate",
            MatchBand::Minimal => "Minimal Match",
        }
    }

    /// Rank with the best band highest, for monotonicity checks.
    pub fn rank(self) -> u8 {
        match self {
            MatchBand::Excellent => 8,
            MatchBand::VeryGood => 7,
            MatchBand::Good => 6,
            MatchBand::Fair => 5,
            MatchBand::BelowAverage => 4,
            MatchBand::Poor => 3,
            MatchBand::VeryPoor => 2,
            MatchBand::Inadequate => 1,
            MatchBand::Minimal => 0,
        }
    }
}

/// Presentation-level mapping result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreMapperResult {
    pub final_score: Score0To100,
    pub match_band: MatchBand,
    pub interview_probability: String,
    pub total_penalty: f64,
    pub auto_reject_risk: bool,
}

/// Map an aggregated score onto its band and probability range.
pub fn map_score(
    final_score: Score0To100,
    total_penalty: f64,
    auto_reject_risk: bool,
) -> ScoreMapperResult {
    ScoreMapperResult {
        final_score,
        match_band: MatchBand::for_score(final_score),
        interview_probability: MatchBand::probability_range(final_score).to_string(),
        total_penalty: total_penalty.min(0.0),
        auto_reject_risk,
    }
}
