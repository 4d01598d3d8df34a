//! Retrieval pillar: how well a hybrid retrieve-and-simulate run answers
//! the questions real users would ask, per spec.md §4.10/§4.11 — the
//! simulation's `overall_score` (mean combined relevance/signal/confidence
//! across all questions, scaled to 0-100) feeds this pillar directly;
//! `findable-simulation` already did the retrieval and thresholding work,
//! so this module only reshapes its aggregate into a scored pillar.

use findable_types::analyzer::{Issue, PillarComponent, SeverityLevel};
use findable_types::pillar::{Pillar, PillarScore};
use findable_types::question::SimulationResult;
use serde_json::json;

const ANSWER_RATE_WEIGHT: f64 = 0.5;
const AVG_SCORE_WEIGHT: f64 = 0.5;

pub struct RetrievalResult {
    pub pillar: PillarScore,
    pub issues: Vec<Issue>,
}

/// `pillar_weight` is this run's configured weight for the Retrieval
/// pillar (`CalibrationConfig.pillar_weights`).
pub fn score_retrieval(sim: &SimulationResult, pillar_weight: f64) -> RetrievalResult {
    let total = sim.question_results.len();
    if total == 0 {
        return RetrievalResult {
            pillar: PillarScore::not_evaluated(Pillar::Retrieval, pillar_weight, "No simulation questions were run"),
            issues: vec![],
        };
    }

    let answered_rate = (sim.questions_answered + sim.questions_partial) as f64 / total as f64;
    let answer_rate_score = answered_rate * 100.0;
    // overall_score is already the simulation's own 0-100 mean combined score.
    let avg_score = sim.overall_score.clamp(0.0, 100.0);

    let answer_rate_component = PillarComponent::new(
        "Questions Answered",
        answer_rate_score,
        ANSWER_RATE_WEIGHT,
        format!(
            "{} fully, {} partially, {} not answerable out of {total} simulated question(s)",
            sim.questions_answered, sim.questions_partial, sim.questions_unanswered
        ),
        json!({
            "questions_answered": sim.questions_answered,
            "questions_partial": sim.questions_partial,
            "questions_unanswered": sim.questions_unanswered,
        }),
    );
    let avg_score_component = PillarComponent::new(
        "Mean Answer Confidence",
        avg_score,
        AVG_SCORE_WEIGHT,
        format!("Mean combined relevance/signal/confidence score {:.1}/100", avg_score),
        json!({}),
    );

    let raw_score = answer_rate_score * ANSWER_RATE_WEIGHT + avg_score * AVG_SCORE_WEIGHT;

    let mut issues = Vec::new();
    if sim.questions_unanswered as f64 / total as f64 > 0.5 {
        issues.push(Issue::new(
            "Over half of simulated questions are not answerable from indexed content; check chunking, heading structure, and topical coverage".to_string(),
            SeverityLevel::Critical,
        ));
    } else if answered_rate < 0.5 {
        issues.push(Issue::new(
            "Fewer than half of simulated questions are fully or partially answerable".to_string(),
            SeverityLevel::Warning,
        ));
    }

    let explanation = format!(
        "{:.0}% of {total} simulated question(s) answerable, averaging {avg_score:.1}/100 combined score",
        answered_rate * 100.0
    );

    let pillar = PillarScore::evaluated(
        Pillar::Retrieval,
        raw_score,
        pillar_weight,
        explanation,
        vec![answer_rate_component, avg_score_component],
    );

    RetrievalResult { pillar, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_types::question::{Answerability, Confidence, QuestionResult, SimulationContext};

    fn result(id: &str, answerability: Answerability, score: f64) -> QuestionResult {
        QuestionResult {
            question_id: id.to_string(),
            answerability,
            score,
            confidence: Confidence::Medium,
            signals_found: 1,
            signals_total: 1,
            relevance_score: score,
            context: SimulationContext { total_chunks: 1, max_relevance_score: score },
        }
    }

    #[test]
    fn zero_questions_not_evaluated() {
        let sim = SimulationResult {
            questions_answered: 0,
            questions_partial: 0,
            questions_unanswered: 0,
            overall_score: 0.0,
            coverage_score: 0.0,
            question_results: vec![],
        };
        let result = score_retrieval(&sim, 20.0);
        assert!(!result.pillar.evaluated);
    }

    #[test]
    fn strong_retrieval_scores_high() {
        let sim = SimulationResult {
            questions_answered: 9,
            questions_partial: 1,
            questions_unanswered: 0,
            overall_score: 85.0,
            coverage_score: 0.9,
            question_results: vec![
                result("q1", Answerability::Fully, 0.9),
                result("q2", Answerability::Partially, 0.5),
            ],
        };
        let result = score_retrieval(&sim, 20.0);
        assert!(result.pillar.raw_score > 80.0);
    }

    #[test]
    fn mostly_unanswered_flags_critical_issue() {
        let sim = SimulationResult {
            questions_answered: 0,
            questions_partial: 1,
            questions_unanswered: 9,
            overall_score: 10.0,
            coverage_score: 0.1,
            question_results: vec![result("q1", Answerability::Not, 0.1)],
        };
        let result = score_retrieval(&sim, 20.0);
        assert!(result.issues.iter().any(|i| i.severity == SeverityLevel::Critical));
    }
}
