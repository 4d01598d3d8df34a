//! Simulation runner (C12): for each generated question, query the site's
//! `RetrievalIndex`, derive relevance/signal/confidence sub-scores, combine
//! them via the active `CalibrationConfig.scoring_sub_weights`, and classify
//! answerability against `CalibrationConfig.thresholds`.
//!
//! Grounded in the worker's simulation loop (`worker/testing` — the bank of
//! questions run per-site through the retrieval pipeline and scored for
//! coverage); the provider ground-truth comparison itself
//! (`worker/testing/ground_truth.py`) is an external collaborator and out of
//! scope, so this runner only ever produces `sim_*` fields, never `obs_*`
//! ones.

use findable_retrieval::RetrievalIndex;
use findable_types::calibration::CalibrationConfig;
use findable_types::question::{Answerability, Confidence, Question, QuestionResult, SimulationContext, SimulationResult};
use futures::stream::{self, StreamExt};

/// Top-k chunks retrieved per question.
const TOP_K: usize = 5;

/// A retrieval score below this floor does not count toward coverage, even
/// if it was technically the best available hit.
const RETRIEVAL_FLOOR: f64 = 0.3;

/// Bounded fan-out for the (CPU-only, but intentionally pooled for
/// consistency with the rest of the pipeline's concurrency model) per-question
/// scoring work.
const DEFAULT_CONCURRENCY: usize = 8;

fn confidence_numeric(confidence: Confidence) -> f64 {
    match confidence {
        Confidence::High => 1.0,
        Confidence::Medium => 0.6,
        Confidence::Low => 0.3,
    }
}

fn classify_confidence(best_score: f64, has_heading_context: bool) -> Confidence {
    if best_score >= 0.75 && has_heading_context {
        Confidence::High
    } else if best_score >= 0.45 {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn classify_answerability(combined: f64, thresholds: &findable_types::calibration::AnswerabilityThresholds) -> Answerability {
    if combined >= thresholds.fully_answerable {
        Answerability::Fully
    } else if combined >= thresholds.partially_answerable {
        Answerability::Partially
    } else {
        Answerability::Not
    }
}

/// Run one question against `index`, producing its `QuestionResult`.
///
/// `signal_match_threshold` is accepted but not applied here: it gates how a
/// *calibration* pass judges a prediction against ground truth
/// (`findable-calibration`), not how the simulation computes its own raw
/// signal fraction. The runner reports `signals_found`/`signals_total` as-is
/// so downstream calibration can apply the threshold against real outcomes.
fn run_one(question: &Question, index: &RetrievalIndex, config: &CalibrationConfig) -> QuestionResult {
    let hits = index.hybrid_retrieve(&question.text, TOP_K);

    if hits.is_empty() {
        return QuestionResult {
            question_id: question.id.clone(),
            answerability: Answerability::Not,
            score: 0.0,
            confidence: Confidence::Low,
            signals_found: 0,
            signals_total: question.expected_signals.len(),
            relevance_score: 0.0,
            context: SimulationContext {
                total_chunks: 0,
                max_relevance_score: 0.0,
            },
        };
    }

    let max_relevance_score = hits.iter().map(|h| h.score).fold(0.0_f64, f64::max);
    let relevance_score = (hits.iter().map(|h| h.score).sum::<f64>() / hits.len() as f64).min(1.0);

    let haystack = hits.iter().map(|h| h.content.to_lowercase()).collect::<Vec<_>>().join(" ");
    let signals_total = question.expected_signals.len();
    let signals_found = question
        .expected_signals
        .iter()
        .filter(|signal| haystack.contains(&signal.to_lowercase()))
        .count();
    let signal_score = if signals_total == 0 { 1.0 } else { signals_found as f64 / signals_total as f64 };

    let best = &hits[0];
    let has_heading_context = best.heading_context.as_ref().is_some_and(|h| !h.trim().is_empty());
    let confidence = classify_confidence(best.score, has_heading_context);

    let weights = &config.scoring_sub_weights;
    let combined = (relevance_score * weights.relevance + signal_score * weights.signal + confidence_numeric(confidence) * weights.confidence)
        .clamp(0.0, 1.0);

    QuestionResult {
        question_id: question.id.clone(),
        answerability: classify_answerability(combined, &config.thresholds),
        score: combined,
        confidence,
        signals_found,
        signals_total,
        relevance_score,
        context: SimulationContext {
            total_chunks: hits.len(),
            max_relevance_score,
        },
    }
}

/// Run every question in `questions` against `index`, bounded by
/// `concurrency`, and aggregate into a `SimulationResult`. Results are
/// sorted by `question_id` before aggregation so the outcome is independent
/// of scheduling order.
pub async fn run_simulation(questions: &[Question], index: &RetrievalIndex, config: &CalibrationConfig, concurrency: Option<usize>) -> SimulationResult {
    let concurrency = concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1);

    let mut results: Vec<QuestionResult> = stream::iter(questions.iter())
        .map(|question| async move { run_one(question, index, config) })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    results.sort_by(|a, b| a.question_id.cmp(&b.question_id));

    let questions_answered = results.iter().filter(|r| r.answerability == Answerability::Fully).count();
    let questions_partial = results.iter().filter(|r| r.answerability == Answerability::Partially).count();
    let questions_unanswered = results.iter().filter(|r| r.answerability == Answerability::Not).count();

    let overall_score = if results.is_empty() {
        0.0
    } else {
        (results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64) * 100.0
    };

    let coverage_score = if results.is_empty() {
        0.0
    } else {
        results.iter().filter(|r| r.context.max_relevance_score >= RETRIEVAL_FLOOR).count() as f64 / results.len() as f64
    };

    SimulationResult {
        questions_answered,
        questions_partial,
        questions_unanswered,
        overall_score,
        coverage_score,
        question_results: results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_retrieval::Embedder;
    use findable_types::question::{Difficulty, QuestionCategory};

    fn entry(id: &str, content: &str, heading: Option<&str>, embedder: &Embedder, position_ratio: f64) -> findable_retrieval::IndexedChunk {
        findable_retrieval::IndexedChunk {
            embedding_id: format!("emb-{id}"),
            chunk_id: id.to_string(),
            page_id: "page-1".to_string(),
            site_id: "site-1".to_string(),
            content: content.to_string(),
            content_hash: findable_retrieval::content_hash(content),
            embedding: embedder.embed(content),
            heading_context: heading.map(|s| s.to_string()),
            position_ratio,
            source_url: "https://example.com/".to_string(),
            page_title: Some("Example".to_string()),
        }
    }

    #[tokio::test]
    async fn well_covered_site_answers_fully() {
        let embedder = Embedder::default();
        let mut index = RetrievalIndex::new("site-1", embedder.clone());
        index.upsert(entry(
            "a",
            "Findable is an audit tool for findable.ai that measures AI visibility for websites",
            Some("About Findable"),
            &embedder,
            0.1,
        ));

        let question = Question {
            id: "identity-1".to_string(),
            text: "What is Findable?".to_string(),
            category: QuestionCategory::Identity,
            difficulty: Difficulty::Easy,
            expected_signals: vec!["findable".to_string(), "findable.ai".to_string()],
        };

        let config = CalibrationConfig::default_active();
        let result = run_simulation(std::slice::from_ref(&question), &index, &config, None).await;
        assert_eq!(result.question_results.len(), 1);
        assert_eq!(result.question_results[0].signals_found, 2);
        assert!(result.overall_score > 0.0);
    }

    #[tokio::test]
    async fn empty_index_yields_not_answerable() {
        let embedder = Embedder::default();
        let index = RetrievalIndex::new("site-1", embedder);
        let question = Question {
            id: "identity-1".to_string(),
            text: "What is Findable?".to_string(),
            category: QuestionCategory::Identity,
            difficulty: Difficulty::Easy,
            expected_signals: vec!["findable".to_string()],
        };
        let config = CalibrationConfig::default_active();
        let result = run_simulation(std::slice::from_ref(&question), &index, &config, None).await;
        assert_eq!(result.question_results[0].answerability, Answerability::Not);
        assert_eq!(result.coverage_score, 0.0);
    }

    #[tokio::test]
    async fn results_are_sorted_by_question_id_regardless_of_input_order() {
        let embedder = Embedder::default();
        let mut index = RetrievalIndex::new("site-1", embedder.clone());
        index.upsert(entry("a", "some content about findable", Some("About"), &embedder, 0.1));

        let questions = vec![
            Question {
                id: "z-question".to_string(),
                text: "z".to_string(),
                category: QuestionCategory::Technical,
                difficulty: Difficulty::Hard,
                expected_signals: vec![],
            },
            Question {
                id: "a-question".to_string(),
                text: "a".to_string(),
                category: QuestionCategory::Identity,
                difficulty: Difficulty::Easy,
                expected_signals: vec![],
            },
        ];
        let config = CalibrationConfig::default_active();
        let result = run_simulation(&questions, &index, &config, None).await;
        assert_eq!(result.question_results[0].question_id, "a-question");
        assert_eq!(result.question_results[1].question_id, "z-question");
    }
}
