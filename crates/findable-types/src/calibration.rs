//! Calibration substrate data model.

use crate::pillar::Pillar;
use crate::question::{Difficulty, QuestionCategory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Scoring sub-weights used to combine relevance/signal/confidence in the
/// simulation runner. Must sum to 1.0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringSubWeights {
    pub relevance: f64,
    pub signal: f64,
    pub confidence: f64,
}

impl Default for ScoringSubWeights {
    fn default() -> Self {
        Self {
            relevance: 0.4,
            signal: 0.4,
            confidence: 0.2,
        }
    }
}

impl ScoringSubWeights {
    pub fn sum_is_valid(&self, epsilon: f64) -> bool {
        (self.relevance + self.signal + self.confidence - 1.0).abs() <= epsilon
    }
}

/// Answerability thresholds. `fully` must exceed `partial`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnswerabilityThresholds {
    pub fully_answerable: f64,
    pub partially_answerable: f64,
}

impl Default for AnswerabilityThresholds {
    fn default() -> Self {
        Self {
            fully_answerable: 0.7,
            partially_answerable: 0.3,
        }
    }
}

impl AnswerabilityThresholds {
    pub fn is_valid(&self) -> bool {
        self.fully_answerable > self.partially_answerable
            && (0.0..=1.0).contains(&self.fully_answerable)
            && (0.0..=1.0).contains(&self.partially_answerable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationStatus {
    Draft,
    Active,
}

/// The weights, thresholds and sub-weights a scoring run uses. Exactly one
/// configuration per arm is `Active` at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    pub id: String,
    pub pillar_weights: HashMap<Pillar, f64>,
    pub thresholds: AnswerabilityThresholds,
    pub signal_match_threshold: f64,
    pub scoring_sub_weights: ScoringSubWeights,
    pub status: CalibrationStatus,
}

impl CalibrationConfig {
    pub const WEIGHT_SUM_EPSILON: f64 = 0.01;

    /// Invariant: weights sum to 100 within epsilon, thresholds ordered,
    /// sub-weights sum to 1.0.
    pub fn is_valid(&self) -> bool {
        let weight_sum: f64 = self.pillar_weights.values().sum();
        (weight_sum - 100.0).abs() <= Self::WEIGHT_SUM_EPSILON
            && self.thresholds.is_valid()
            && self.scoring_sub_weights.sum_is_valid(1e-6)
    }

    pub fn default_weights() -> HashMap<Pillar, f64> {
        HashMap::from([
            (Pillar::Technical, 20.0),
            (Pillar::Structure, 20.0),
            (Pillar::Schema, 15.0),
            (Pillar::Authority, 15.0),
            (Pillar::Retrieval, 20.0),
            (Pillar::Coverage, 10.0),
        ])
    }

    pub fn default_active() -> Self {
        Self {
            id: "default".to_string(),
            pillar_weights: Self::default_weights(),
            thresholds: AnswerabilityThresholds::default(),
            signal_match_threshold: 0.5,
            scoring_sub_weights: ScoringSubWeights::default(),
            status: CalibrationStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeMatch {
    TruePositive,
    TrueNegative,
    FalsePositive,
    FalseNegative,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentArm {
    Control,
    Treatment,
}

/// An append-only ground-truth observation joined to a simulated prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationSample {
    pub id: String,
    pub question_id: String,
    pub sim_answerability: crate::question::Answerability,
    pub sim_score: f64,
    pub sim_signals_found: usize,
    pub sim_signals_total: usize,
    pub obs_mentioned: bool,
    pub obs_cited: bool,
    pub outcome_match: OutcomeMatch,
    pub prediction_accurate: bool,
    pub question_category: QuestionCategory,
    pub difficulty: Difficulty,
    pub experiment_id: Option<String>,
    pub arm: Option<ExperimentArm>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftAlertState {
    Open,
    Acknowledged,
    Resolved,
}

/// A detected drift between a baseline and rolling observation window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftAlert {
    pub id: String,
    pub metric: String,
    pub baseline_value: f64,
    pub observed_value: f64,
    pub magnitude: f64,
    pub state: DriftAlertState,
    pub action_taken: Option<String>,
    pub opened_at: DateTime<Utc>,
}

/// An A/B calibration experiment between two configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationExperiment {
    pub id: String,
    pub control_config_id: String,
    pub treatment_config_id: String,
    pub treatment_allocation: f64,
    pub min_samples_per_arm: usize,
    pub control_count: usize,
    pub treatment_count: usize,
    pub control_accurate: usize,
    pub treatment_accurate: usize,
    pub p_value: Option<f64>,
    pub winner: Option<ExperimentArm>,
}
