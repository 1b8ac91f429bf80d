//! Aggregation and calibration stages.
//!
//! Everything in this module is a pure function over the core data model:
//! candidate-level detection, weight redistribution, weighted aggregation,
//! band mapping, confidence calculation, proportional penalties, red-flag
//! rules, and keyword-context scoring. The pipeline module wires these
//! together; nothing here performs I/O.

pub mod aggregator;
pub mod band;
pub mod confidence;
pub mod critical_metrics;
pub mod keyword_context;
pub mod level;
pub mod penalty;
pub mod red_flags;
pub mod weights;

pub use aggregator::{aggregate, total_penalty, AggregateScore};
pub use band::{map_score, MatchBand, ScoreMapperResult};
pub use confidence::{
    calculate_confidence, ConfidenceBreakdown, ConfidenceFeatures, ConfidenceLevel,
    WeightingMode,
};
pub use critical_metrics::CriticalMetrics;
pub use keyword_context::{
    analyze_stuffing, validate_occurrences, KeywordContext, SpanPosition, StuffingAnalysis,
};
pub use level::{detect_candidate_level, required_years};
pub use penalty::{
    apply_penalties, severity_policy, PenaltyOutcome, PenaltySignal, PenaltyType,
    ProportionalPenalty,
};
pub use red_flags::{auto_reject_risk, critical_count, detect_red_flags};
pub use weights::{normalize_weights, weight_for, RoleProfile};
