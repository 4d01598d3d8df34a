//! The common analyzer-output shape.
//!
//! The source favors a family of analyzer value objects, each with its own
//! `to_dict`. Rather than a trait object per analyzer we model a tagged
//! variant per output (one struct per analyzer in `findable-analyzers`) plus
//! this shared `PillarComponent` record that the six pillar scorers
//! (`findable-scoring`) consume uniformly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Progress-based level: used where more is strictly better (e.g. Technical
/// sub-components). `full >= 80`, `partial >= 50`, else `limited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressLevel {
    Full,
    Partial,
    Limited,
}

impl ProgressLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ProgressLevel::Full
        } else if score >= 50.0 {
            ProgressLevel::Partial
        } else {
            ProgressLevel::Limited
        }
    }
}

/// Severity-based level: used where a low score indicates a problem to fix
/// (e.g. JS dependence, robots-AI access).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Good,
    Warning,
    Critical,
}

impl SeverityLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            SeverityLevel::Good
        } else if score >= 50.0 {
            SeverityLevel::Warning
        } else {
            SeverityLevel::Critical
        }
    }
}

/// A single diagnostic raised by an analyzer. Analyzers never raise errors;
/// they append issues instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    pub severity: SeverityLevel,
}

impl Issue {
    pub fn new(message: impl Into<String>, severity: SeverityLevel) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// A weighted component feeding into a `PillarScore`. Every pillar scorer
/// (`findable-scoring`) is a plain function over a slice of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillarComponent {
    pub name: String,
    pub raw_score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    pub level: ProgressLevel,
    pub explanation: String,
    pub details: Value,
}

impl PillarComponent {
    pub fn new(
        name: impl Into<String>,
        raw_score: f64,
        weight: f64,
        explanation: impl Into<String>,
        details: Value,
    ) -> Self {
        let raw_score = raw_score.clamp(0.0, 100.0);
        Self {
            name: name.into(),
            raw_score,
            weight,
            weighted_score: raw_score * weight,
            level: ProgressLevel::from_score(raw_score),
            explanation: explanation.into(),
            details,
        }
    }
}
