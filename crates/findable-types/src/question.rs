//! Question generation & simulation data model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Identity,
    Offerings,
    HowTo,
    Comparison,
    Faq,
    Technical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A deterministically generated question about a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
    pub expected_signals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Answerability {
    Fully,
    Partially,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Retrieval context summary attached to a `QuestionResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationContext {
    pub total_chunks: usize,
    pub max_relevance_score: f64,
}

/// The per-question answerability verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub answerability: Answerability,
    pub score: f64,
    pub confidence: Confidence,
    pub signals_found: usize,
    pub signals_total: usize,
    pub relevance_score: f64,
    pub context: SimulationContext,
}

/// Aggregated outcome of simulating every question against the retrieval index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub questions_answered: usize,
    pub questions_partial: usize,
    pub questions_unanswered: usize,
    pub overall_score: f64,
    pub coverage_score: f64,
    pub question_results: Vec<QuestionResult>,
}

/// Minimal site context the question generator is a pure function of.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteContext {
    pub company_name: String,
    pub domain: String,
    pub schema_types: Vec<String>,
    pub headings: Vec<String>,
}
