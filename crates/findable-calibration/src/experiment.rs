//! A/B calibration experiments (spec.md §3 `calibration_experiments`,
//! §4.12): once both arms have `min_samples_per_arm` joined samples, a
//! two-proportion z-test over accuracy counts annotates a `winner` and
//! `p_value`. Per spec.md §9's design note, the weight optimizer's stopping
//! criterion is informational only — this module never flips a config's
//! `CalibrationStatus` to `Active` itself, it only records which arm looks
//! better so a human (or a separate activation step the spec deliberately
//! leaves out of scope) can decide.

use findable_types::calibration::{CalibrationExperiment, ExperimentArm};

/// Standard normal CDF via the Abramowitz & Stegun erf approximation — good
/// enough for a two-proportion z-test's p-value, and avoids depending on a
/// statistics crate for one function.
fn standard_normal_cdf(z: f64) -> f64 {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}

fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}

/// Two-proportion z-test comparing `control_accurate/control_count` against
/// `treatment_accurate/treatment_count`. Returns `None` when either arm has
/// zero samples (the test is undefined) or the pooled proportion is exactly
/// 0 or 1 (zero variance, no meaningful z-score).
fn two_proportion_z_test(control_accurate: usize, control_count: usize, treatment_accurate: usize, treatment_count: usize) -> Option<f64> {
    if control_count == 0 || treatment_count == 0 {
        return None;
    }
    let p1 = control_accurate as f64 / control_count as f64;
    let p2 = treatment_accurate as f64 / treatment_count as f64;
    let pooled = (control_accurate + treatment_accurate) as f64 / (control_count + treatment_count) as f64;
    if pooled <= 0.0 || pooled >= 1.0 {
        return None;
    }
    let se = (pooled * (1.0 - pooled) * (1.0 / control_count as f64 + 1.0 / treatment_count as f64)).sqrt();
    if se == 0.0 {
        return None;
    }
    let z = (p2 - p1) / se;
    let p_value = 2.0 * (1.0 - standard_normal_cdf(z.abs()));
    Some(p_value)
}

/// Evaluate `experiment` against its recorded counters. Returns an updated
/// copy with `p_value`/`winner` filled in once `min_samples_per_arm` is
/// reached on both sides; below that, both remain `None`. The experiment's
/// own `control_config_id`/`treatment_config_id` fields determine which
/// config an operator would promote, never this function.
pub fn evaluate(experiment: &CalibrationExperiment) -> CalibrationExperiment {
    let mut evaluated = experiment.clone();

    if experiment.control_count < experiment.min_samples_per_arm || experiment.treatment_count < experiment.min_samples_per_arm {
        evaluated.p_value = None;
        evaluated.winner = None;
        return evaluated;
    }

    let Some(p_value) = two_proportion_z_test(
        experiment.control_accurate,
        experiment.control_count,
        experiment.treatment_accurate,
        experiment.treatment_count,
    ) else {
        evaluated.p_value = None;
        evaluated.winner = None;
        return evaluated;
    };

    evaluated.p_value = Some(p_value);
    evaluated.winner = if p_value < 0.05 {
        let control_rate = experiment.control_accurate as f64 / experiment.control_count as f64;
        let treatment_rate = experiment.treatment_accurate as f64 / experiment.treatment_count as f64;
        Some(if treatment_rate > control_rate {
            ExperimentArm::Treatment
        } else {
            ExperimentArm::Control
        })
    } else {
        None
    };

    evaluated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experiment(min_samples: usize, control_count: usize, control_accurate: usize, treatment_count: usize, treatment_accurate: usize) -> CalibrationExperiment {
        CalibrationExperiment {
            id: "exp-1".to_string(),
            control_config_id: "default".to_string(),
            treatment_config_id: "variant-a".to_string(),
            treatment_allocation: 0.5,
            min_samples_per_arm: min_samples,
            control_count,
            treatment_count,
            control_accurate,
            treatment_accurate,
            p_value: None,
            winner: None,
        }
    }

    #[test]
    fn under_sampled_experiment_has_no_verdict() {
        let exp = experiment(100, 10, 8, 10, 9);
        let evaluated = evaluate(&exp);
        assert!(evaluated.p_value.is_none());
        assert!(evaluated.winner.is_none());
    }

    #[test]
    fn clear_treatment_win_is_reported_but_never_activated() {
        let exp = experiment(50, 200, 100, 200, 170);
        let evaluated = evaluate(&exp);
        assert!(evaluated.p_value.unwrap() < 0.05);
        assert_eq!(evaluated.winner, Some(ExperimentArm::Treatment));
        // evaluate() never touches any CalibrationConfig.status — the
        // CalibrationExperiment it returns is purely informational.
    }

    #[test]
    fn near_identical_arms_report_no_significant_winner() {
        let exp = experiment(50, 200, 100, 200, 101);
        let evaluated = evaluate(&exp);
        assert!(evaluated.winner.is_none());
    }
}
