//! The final Findable Score.

use crate::pillar::PillarScore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(total_score: f64) -> Self {
        if total_score >= 90.0 {
            Grade::A
        } else if total_score >= 80.0 {
            Grade::B
        } else if total_score >= 70.0 {
            Grade::C
        } else if total_score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

/// The composed, top-level audit result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindableScore {
    pub total_score: f64,
    pub grade: Grade,
    pub pillars: Vec<PillarScore>,
    pub pillars_evaluated: usize,
    pub pillars_not_evaluated: usize,
    pub is_partial: bool,
    pub max_evaluated_points: f64,
    pub evaluated_score_pct: f64,
    pub critical_issues: Vec<String>,
    pub fixes: Vec<String>,
}
