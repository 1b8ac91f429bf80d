//! Proportional penalty application.
//!
//! Missing or weak signals become severity-scaled penalties applied
//! sequentially to a running score, strongest severity first. Each step
//! removes `running_score * applied_penalty / 100` points, and the run
//! stops once the cumulative reduction reaches the global cap. The cap is
//! enforced across the whole run, not per item; with several critical
//! issues the global cap dominates quickly (see DESIGN.md for why this is
//! left as observed rather than redesigned).

use serde::{Deserialize, Serialize};

use crate::core::Severity;

/// What kind of gap triggered a penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyType {
    MissingCriticalSkill,
    MissingOptionalSkill,
    DateIssue,
    Formatting,
    ExperienceGap,
}

/// A missing/weak signal before penalty math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltySignal {
    pub penalty_type: PenaltyType,
    pub severity: Severity,
    pub reason: String,
}

impl PenaltySignal {
    pub fn new(penalty_type: PenaltyType, severity: Severity, reason: impl Into<String>) -> Self {
        Self {
            penalty_type,
            severity,
            reason: reason.into(),
        }
    }
}

/// One applied penalty, with the figures that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProportionalPenalty {
    #[serde(rename = "type")]
    pub penalty_type: PenaltyType,
    pub severity: Severity,
    pub penalty_percentage: f64,
    pub max_penalty: f64,
    /// The percentage actually applied this step, <= max_penalty.
    pub applied_penalty: f64,
    pub reason: String,
}

/// Result of one sequential penalty run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyOutcome {
    pub adjusted_score: f64,
    pub applied: Vec<ProportionalPenalty>,
    /// Total points removed, bounded by the global cap.
    pub total_reduction: f64,
}

/// Severity policy table: (penalty percentage, per-item max penalty).
pub fn severity_policy(severity: Severity) -> (f64, f64) {
    match severity {
        Severity::Critical => (3.0, 15.0),
        Severity::High => (2.0, 12.0),
        Severity::Medium => (1.5, 10.0),
        Severity::Low => (1.0, 8.0),
    }
}

/// Apply penalties sequentially, strongest severity first.
pub fn apply_penalties(
    base_score: f64,
    signals: &[PenaltySignal],
    global_cap: f64,
) -> PenaltyOutcome {
    let base = if base_score.is_finite() {
        base_score.max(0.0)
    } else {
        0.0
    };

    let mut ordered: Vec<&PenaltySignal> = signals.iter().collect();
    // Stable: equal severities keep their detection order.
    ordered.sort_by(|a, b| b.severity.cmp(&a.severity));

    let mut running = base;
    let mut total_reduction = 0.0;
    let mut applied = Vec::new();

    for signal in ordered {
        if total_reduction >= global_cap {
            break;
        }
        let (percentage, max_penalty) = severity_policy(signal.severity);
        let applied_penalty = percentage.min(max_penalty);
        let mut reduction = running * applied_penalty / 100.0;
        if total_reduction + reduction > global_cap {
            reduction = global_cap - total_reduction;
        }
        running -= reduction;
        total_reduction += reduction;
        applied.push(ProportionalPenalty {
            penalty_type: signal.penalty_type,
            severity: signal.severity,
            penalty_percentage: percentage,
            max_penalty,
            applied_penalty,
            reason: signal.reason.clone(),
        });
    }

    PenaltyOutcome {
        adjusted_score: running.max(0.0),
        applied,
        total_reduction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn signal(severity: Severity) -> PenaltySignal {
        PenaltySignal::new(PenaltyType::MissingCriticalSkill, severity, "missing")
    }

    #[test]
    fn severity_table_matches_the_policy() {
        assert_eq!(severity_policy(Severity::Critical), (3.0, 15.0));
        assert_eq!(severity_policy(Severity::High), (2.0, 12.0));
        assert_eq!(severity_policy(Severity::Medium), (1.5, 10.0));
        assert_eq!(severity_policy(Severity::Low), (1.0, 8.0));
    }

    #[test]
    fn single_critical_penalty_never_exceeds_15_percent_of_base() {
        for base in [10.0, 40.0, 75.0, 100.0] {
            let outcome = apply_penalties(base, &[signal(Severity::Critical)], 15.0);
            assert!(outcome.total_reduction <= base * 0.15 + 1e-9);
            // A single critical item removes 3% of the running score.
            assert!((outcome.adjusted_score - base * 0.97).abs() < 1e-9);
        }
    }

    #[test]
    fn applied_penalty_never_exceeds_max_penalty() {
        let outcome = apply_penalties(
            80.0,
            &[signal(Severity::Critical), signal(Severity::Low)],
            15.0,
        );
        for penalty in &outcome.applied {
            assert!(penalty.applied_penalty <= penalty.max_penalty);
        }
    }

    #[test]
    fn penalties_apply_in_severity_order() {
        let signals = vec![
            signal(Severity::Low),
            signal(Severity::Critical),
            signal(Severity::Medium),
        ];
        let outcome = apply_penalties(80.0, &signals, 15.0);
        let severities: Vec<Severity> = outcome.applied.iter().map(|p| p.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Critical, Severity::Medium, Severity::Low]
        );
    }

    #[test]
    fn each_step_reduces_the_running_score_proportionally() {
        let signals = vec![signal(Severity::Critical), signal(Severity::High)];
        let outcome = apply_penalties(100.0, &signals, 15.0);
        // 100 -> 97 (3%) -> 97 - 1.94 (2% of 97)
        assert!((outcome.adjusted_score - 95.06).abs() < 1e-9);
        assert!((outcome.total_reduction - 4.94).abs() < 1e-9);
    }

    #[test]
    fn global_cap_bounds_the_whole_run() {
        let signals: Vec<PenaltySignal> =
            (0..20).map(|_| signal(Severity::Critical)).collect();
        let outcome = apply_penalties(100.0, &signals, 15.0);
        assert!((outcome.total_reduction - 15.0).abs() < 1e-9);
        assert!((outcome.adjusted_score - 85.0).abs() < 1e-9);
        // Items past the cap are never applied.
        assert!(outcome.applied.len() < signals.len());
    }

    #[test]
    fn cap_can_truncate_a_step_partially() {
        let signals = vec![signal(Severity::Critical), signal(Severity::Critical)];
        let outcome = apply_penalties(100.0, &signals, 4.0);
        // First step removes 3.0; the second is truncated from 2.91 to 1.0.
        assert!((outcome.total_reduction - 4.0).abs() < 1e-9);
        assert_eq!(outcome.applied.len(), 2);
    }

    #[test]
    fn empty_signal_list_leaves_the_score_untouched() {
        let outcome = apply_penalties(64.0, &[], 15.0);
        assert_eq!(outcome.adjusted_score, 64.0);
        assert!(outcome.applied.is_empty());
        assert_eq!(outcome.total_reduction, 0.0);
    }

    #[test]
    fn non_finite_base_degrades_to_zero() {
        let outcome = apply_penalties(f64::NAN, &[signal(Severity::Low)], 15.0);
        assert_eq!(outcome.adjusted_score, 0.0);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_severity() -> impl Strategy<Value = Severity> {
        prop_oneof![
            Just(Severity::Low),
            Just(Severity::Medium),
            Just(Severity::High),
            Just(Severity::Critical),
        ]
    }

    proptest! {
        #[test]
        fn reduction_never_exceeds_cap_and_score_stays_in_bounds(
            base in 0.0..100.0f64,
            severities in proptest::collection::vec(arb_severity(), 0..12),
        ) {
            let signals: Vec<PenaltySignal> = severities
                .into_iter()
                .map(|s| PenaltySignal::new(PenaltyType::DateIssue, s, "x"))
                .collect();
            let outcome = apply_penalties(base, &signals, 15.0);
            prop_assert!(outcome.total_reduction <= 15.0 + 1e-9);
            prop_assert!(outcome.adjusted_score >= 0.0);
            prop_assert!(outcome.adjusted_score <= base + 1e-9);
            prop_assert!((base - outcome.adjusted_score - outcome.total_reduction).abs() < 1e-6);
        }
    }
}
