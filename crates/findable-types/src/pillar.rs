//! Pillar scores and the six (optionally seven) named pillars.

use crate::analyzer::{PillarComponent, ProgressLevel};
use serde::{Deserialize, Serialize};

/// The named scoring axes. `EntityRecognition` is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    Technical,
    Structure,
    Schema,
    Authority,
    Retrieval,
    Coverage,
    EntityRecognition,
}

impl Pillar {
    pub fn name(&self) -> &'static str {
        match self {
            Pillar::Technical => "technical",
            Pillar::Structure => "structure",
            Pillar::Schema => "schema",
            Pillar::Authority => "authority",
            Pillar::Retrieval => "retrieval",
            Pillar::Coverage => "coverage",
            Pillar::EntityRecognition => "entity_recognition",
        }
    }
}

/// A single pillar's computed score, with the components it was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillarScore {
    pub name: Pillar,
    pub raw_score: f64,
    pub weight: f64,
    pub points_earned: f64,
    pub max_points: f64,
    pub level: ProgressLevel,
    pub evaluated: bool,
    pub explanation: String,
    pub components: Vec<PillarComponent>,
}

impl PillarScore {
    pub fn evaluated(
        name: Pillar,
        raw_score: f64,
        weight: f64,
        explanation: impl Into<String>,
        components: Vec<PillarComponent>,
    ) -> Self {
        let raw_score = raw_score.clamp(0.0, 100.0);
        Self {
            name,
            raw_score,
            weight,
            points_earned: raw_score / 100.0 * weight,
            max_points: weight,
            level: ProgressLevel::from_score(raw_score),
            evaluated: true,
            explanation: explanation.into(),
            components,
        }
    }

    pub fn not_evaluated(name: Pillar, weight: f64, explanation: impl Into<String>) -> Self {
        Self {
            name,
            raw_score: 0.0,
            weight,
            points_earned: 0.0,
            max_points: weight,
            level: ProgressLevel::Limited,
            evaluated: false,
            explanation: explanation.into(),
            components: Vec::new(),
        }
    }
}
