//! resumap: resume scoring and calibration engine.
//!
//! Runs a fixed set of independent rule-based tier analyzers over a
//! structured resume (optionally matched against a job description),
//! then aggregates their heterogeneous outputs into one calibrated score,
//! a discrete match band, an interview-probability estimate, and a
//! confidence level. Deterministic, purely functional per invocation,
//! and degradation-tolerant: analyzer failures, malformed inputs, and
//! semantic-matcher timeouts lower the score instead of crashing the run.

pub mod analyzers;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod semantic;

// Re-export commonly used types
pub use crate::config::ScoringConfig;
pub use crate::core::input::{
    ExtractionMode, FileMetadata, RawResumeInput, ResumeData, ResumeDocument, UserType,
};
pub use crate::core::{
    CandidateLevel, CandidateLevelResult, RedFlag, RedFlagType, Severity, Tier, TierScore,
    TierScores,
};
pub use crate::pipeline::ScoringEngine;
pub use crate::report::{AnalysisReport, MissingKeyword};
pub use crate::scoring::{
    ConfidenceBreakdown, ConfidenceLevel, MatchBand, RoleProfile, WeightingMode,
};
pub use crate::semantic::{LiteralOnlyMatcher, SemanticMatcher};

pub use crate::analyzers::{TierAnalyzer, AnalyzerError};
