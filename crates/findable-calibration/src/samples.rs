//! Calibration sample logging (spec.md §3 `CalibrationSample`, §4.12):
//! append-only (prediction, observation) pairs joined on `question_id`.
//!
//! Grounded in `original_source/worker/testing/comparison.py`'s
//! `compare_site`, which classifies a site's pipeline prediction against
//! observed AI-provider citations into true/false positive/negative. That
//! file compares a whole site's `predicted_score`/`citation_rate` in one
//! shot; here the same TP/TN/FP/FN classification is applied per question,
//! since this crate's `CalibrationSample` is question-scoped, and ground
//! truth (`obs_mentioned`/`obs_cited`) may not exist yet when a sample is
//! first recorded. Collecting that ground truth itself
//! (`original_source/worker/testing/ground_truth.py`, querying live AI
//! providers) is an external collaborator out of scope here; this module
//! only ever consumes already-computed `obs_mentioned`/`obs_cited` booleans.

use findable_types::calibration::{CalibrationSample, ExperimentArm, OutcomeMatch};
use findable_types::question::{Answerability, Difficulty, QuestionCategory, QuestionResult};
use chrono::Utc;

/// A question is "predicted findable" if the simulation judged it at least
/// partially answerable — an `Answerability::Not` verdict predicts the
/// question would go unanswered, and thus the site uncited for it.
fn predicted_findable(sim_answerability: Answerability) -> bool {
    !matches!(sim_answerability, Answerability::Not)
}

fn classify_outcome(predicted_findable: bool, obs_cited: bool) -> OutcomeMatch {
    match (predicted_findable, obs_cited) {
        (true, true) => OutcomeMatch::TruePositive,
        (false, false) => OutcomeMatch::TrueNegative,
        (true, false) => OutcomeMatch::FalsePositive,
        (false, true) => OutcomeMatch::FalseNegative,
    }
}

/// Record a sample at simulation time, before any ground truth exists.
/// `outcome_match` is `Unknown` and `prediction_accurate` is `false` until
/// [`join_ground_truth`] supplies real observations.
pub fn record_sample(
    id: String,
    result: &QuestionResult,
    question_category: QuestionCategory,
    difficulty: Difficulty,
    experiment_id: Option<String>,
    arm: Option<ExperimentArm>,
) -> CalibrationSample {
    CalibrationSample {
        id,
        question_id: result.question_id.clone(),
        sim_answerability: result.answerability,
        sim_score: result.score,
        sim_signals_found: result.signals_found,
        sim_signals_total: result.signals_total,
        obs_mentioned: false,
        obs_cited: false,
        outcome_match: OutcomeMatch::Unknown,
        prediction_accurate: false,
        question_category,
        difficulty,
        experiment_id,
        arm,
        recorded_at: Utc::now(),
    }
}

/// Join ground truth into a previously recorded sample, recomputing
/// `outcome_match`/`prediction_accurate`. Consumes and returns the sample
/// since a `CalibrationSample` is meant to be append-only log state, not
/// mutated in place by callers.
pub fn join_ground_truth(mut sample: CalibrationSample, obs_mentioned: bool, obs_cited: bool) -> CalibrationSample {
    let predicted = predicted_findable(sample.sim_answerability);
    sample.obs_mentioned = obs_mentioned;
    sample.obs_cited = obs_cited;
    sample.outcome_match = classify_outcome(predicted, obs_cited);
    sample.prediction_accurate = matches!(sample.outcome_match, OutcomeMatch::TruePositive | OutcomeMatch::TrueNegative);
    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_types::question::SimulationContext;

    fn result(answerability: Answerability) -> QuestionResult {
        QuestionResult {
            question_id: "identity-1".to_string(),
            answerability,
            score: 0.8,
            confidence: findable_types::question::Confidence::High,
            signals_found: 2,
            signals_total: 2,
            relevance_score: 0.9,
            context: SimulationContext {
                total_chunks: 3,
                max_relevance_score: 0.9,
            },
        }
    }

    #[test]
    fn fresh_sample_is_unknown_until_joined() {
        let sample = record_sample("s-1".to_string(), &result(Answerability::Fully), QuestionCategory::Identity, Difficulty::Easy, None, None);
        assert_eq!(sample.outcome_match, OutcomeMatch::Unknown);
        assert!(!sample.prediction_accurate);
    }

    #[test]
    fn fully_answerable_and_cited_is_a_true_positive() {
        let sample = record_sample("s-1".to_string(), &result(Answerability::Fully), QuestionCategory::Identity, Difficulty::Easy, None, None);
        let joined = join_ground_truth(sample, true, true);
        assert_eq!(joined.outcome_match, OutcomeMatch::TruePositive);
        assert!(joined.prediction_accurate);
    }

    #[test]
    fn fully_answerable_but_not_cited_is_a_false_positive() {
        let sample = record_sample("s-1".to_string(), &result(Answerability::Fully), QuestionCategory::Identity, Difficulty::Easy, None, None);
        let joined = join_ground_truth(sample, false, false);
        assert_eq!(joined.outcome_match, OutcomeMatch::FalsePositive);
        assert!(!joined.prediction_accurate);
    }

    #[test]
    fn unanswerable_but_cited_is_a_false_negative() {
        let sample = record_sample("s-1".to_string(), &result(Answerability::Not), QuestionCategory::Technical, Difficulty::Hard, None, None);
        let joined = join_ground_truth(sample, true, true);
        assert_eq!(joined.outcome_match, OutcomeMatch::FalseNegative);
        assert!(!joined.prediction_accurate);
    }
}
