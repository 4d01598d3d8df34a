//! Drift detection (spec.md §4.12): compares a rolling window of samples
//! against a baseline window and flags when accuracy, optimism or
//! pessimism moves beyond a configurable magnitude, given enough samples
//! in both windows to trust the comparison.
//!
//! The accuracy/optimism/pessimism metric trio is the same one
//! `original_source/worker/testing/comparison.py`'s `ValidationMetrics`
//! computes over a whole validation corpus; here it is computed twice, once
//! per window, and the two are diffed.

use chrono::Utc;
use findable_types::calibration::{CalibrationSample, DriftAlert, DriftAlertState, OutcomeMatch};
use uuid::Uuid;

/// Bias/accuracy metrics over one window of joined samples. Samples whose
/// ground truth has not yet been joined (`OutcomeMatch::Unknown`) are
/// excluded, since they carry no TP/TN/FP/FN signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowMetrics {
    pub sample_count: usize,
    pub accuracy: f64,
    pub optimism_rate: f64,
    pub pessimism_rate: f64,
}

pub fn compute_window_metrics(samples: &[CalibrationSample]) -> WindowMetrics {
    let joined: Vec<&CalibrationSample> = samples.iter().filter(|s| s.outcome_match != OutcomeMatch::Unknown).collect();
    let total = joined.len();
    if total == 0 {
        return WindowMetrics {
            sample_count: 0,
            accuracy: 0.0,
            optimism_rate: 0.0,
            pessimism_rate: 0.0,
        };
    }

    let accurate = joined.iter().filter(|s| s.prediction_accurate).count();
    let false_positives = joined.iter().filter(|s| s.outcome_match == OutcomeMatch::FalsePositive).count();
    let false_negatives = joined.iter().filter(|s| s.outcome_match == OutcomeMatch::FalseNegative).count();

    WindowMetrics {
        sample_count: total,
        accuracy: accurate as f64 / total as f64,
        optimism_rate: false_positives as f64 / total as f64,
        pessimism_rate: false_negatives as f64 / total as f64,
    }
}

/// Drift-detection configuration. Defaults chosen so a single borderline
/// sample can't trigger an alert: a 30-day rolling window compared to a
/// baseline, with at least 20 joined samples on each side and a 0.15
/// absolute swing required on any one metric.
#[derive(Debug, Clone, Copy)]
pub struct DriftConfig {
    pub min_samples_per_window: usize,
    pub magnitude_threshold: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            min_samples_per_window: 20,
            magnitude_threshold: 0.15,
        }
    }
}

fn alert_if_drifted(metric: &str, baseline_value: f64, observed_value: f64, config: &DriftConfig) -> Option<DriftAlert> {
    let magnitude = (observed_value - baseline_value).abs();
    if magnitude < config.magnitude_threshold {
        return None;
    }
    Some(DriftAlert {
        id: Uuid::new_v4().to_string(),
        metric: metric.to_string(),
        baseline_value,
        observed_value,
        magnitude,
        state: DriftAlertState::Open,
        action_taken: None,
        opened_at: Utc::now(),
    })
}

/// Compare `baseline` against `rolling`, returning one `DriftAlert` per
/// metric that drifted beyond `config.magnitude_threshold`, provided both
/// windows meet `config.min_samples_per_window`. Returns no alerts (rather
/// than a false reading) when either window is under-sampled.
pub fn detect_drift(baseline: &[CalibrationSample], rolling: &[CalibrationSample], config: &DriftConfig) -> Vec<DriftAlert> {
    let baseline_metrics = compute_window_metrics(baseline);
    let rolling_metrics = compute_window_metrics(rolling);

    if baseline_metrics.sample_count < config.min_samples_per_window || rolling_metrics.sample_count < config.min_samples_per_window {
        return Vec::new();
    }

    [
        alert_if_drifted("accuracy", baseline_metrics.accuracy, rolling_metrics.accuracy, config),
        alert_if_drifted("optimism_rate", baseline_metrics.optimism_rate, rolling_metrics.optimism_rate, config),
        alert_if_drifted("pessimism_rate", baseline_metrics.pessimism_rate, rolling_metrics.pessimism_rate, config),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Advance a drift alert's state machine: `open -> acknowledged -> resolved`.
/// Returns `Err` describing the invalid transition rather than panicking —
/// this is driven by whatever UI/API surfaces alerts to a human operator.
pub fn transition(alert: &mut DriftAlert, next: DriftAlertState, action_taken: Option<String>) -> Result<(), String> {
    let valid = matches!(
        (alert.state, next),
        (DriftAlertState::Open, DriftAlertState::Acknowledged)
            | (DriftAlertState::Open, DriftAlertState::Resolved)
            | (DriftAlertState::Acknowledged, DriftAlertState::Resolved)
    );
    if !valid {
        return Err(format!("cannot transition drift alert from {:?} to {:?}", alert.state, next));
    }
    alert.state = next;
    if action_taken.is_some() {
        alert.action_taken = action_taken;
    }
    Ok(())
}
