//! Run-over-run score comparison.
//!
//! Named and shaped after the `ScoreDeltaCalculator`/`compare_scores`/
//! `build_trend_data` exports declared in the original's
//! `worker/scoring/__init__.py` (the package only ever shipped the export
//! list, not the bodies — the shapes here are inferred from those names and
//! from how `FindableScore`/`PillarScore` are structured elsewhere in this
//! crate). Used by the calibration substrate's drift reporting, and by any
//! report that shows "up 4 points since last week."

use findable_types::pillar::Pillar;
use findable_types::score::FindableScore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    Improved,
    Declined,
    Unchanged,
}

/// How large a change is, independent of direction. Thresholds chosen to
/// match the level bands the rest of this crate uses (`ProgressLevel`'s
/// `full`/`partial`/`limited` split is 80/50 — a >=10 point swing is enough
/// to cross one of those bands on its own).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeSignificance {
    Major,
    Minor,
    Negligible,
}

impl ChangeSignificance {
    fn from_abs_delta(abs_delta: f64) -> Self {
        if abs_delta >= 10.0 {
            ChangeSignificance::Major
        } else if abs_delta >= 2.0 {
            ChangeSignificance::Minor
        } else {
            ChangeSignificance::Negligible
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PillarDelta {
    pub pillar: Pillar,
    pub previous_score: f64,
    pub current_score: f64,
    pub delta: f64,
    pub direction: ChangeDirection,
    pub significance: ChangeSignificance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreDelta {
    pub previous_total: f64,
    pub current_total: f64,
    pub total_delta: f64,
    pub direction: ChangeDirection,
    pub significance: ChangeSignificance,
    pub pillar_deltas: Vec<PillarDelta>,
    pub newly_resolved_issues: Vec<String>,
    pub newly_introduced_issues: Vec<String>,
}

fn direction_of(delta: f64) -> ChangeDirection {
    if delta > 0.01 {
        ChangeDirection::Improved
    } else if delta < -0.01 {
        ChangeDirection::Declined
    } else {
        ChangeDirection::Unchanged
    }
}

/// Compares two `FindableScore`s from successive runs against the same
/// site. Pillar-for-pillar by `Pillar` identity; a pillar evaluated in one
/// run but not the other is skipped (nothing meaningful to delta).
pub fn compare_scores(previous: &FindableScore, current: &FindableScore) -> ScoreDelta {
    let total_delta = current.total_score - previous.total_score;

    let mut pillar_deltas = Vec::new();
    for current_pillar in &current.pillars {
        let Some(previous_pillar) = previous.pillars.iter().find(|p| p.name == current_pillar.name) else {
            continue;
        };
        if !previous_pillar.evaluated || !current_pillar.evaluated {
            continue;
        }
        let delta = current_pillar.raw_score - previous_pillar.raw_score;
        pillar_deltas.push(PillarDelta {
            pillar: current_pillar.name,
            previous_score: previous_pillar.raw_score,
            current_score: current_pillar.raw_score,
            delta,
            direction: direction_of(delta),
            significance: ChangeSignificance::from_abs_delta(delta.abs()),
        });
    }

    let previous_issues: std::collections::HashSet<&String> = previous.critical_issues.iter().collect();
    let current_issues: std::collections::HashSet<&String> = current.critical_issues.iter().collect();
    let newly_resolved_issues = previous_issues.difference(&current_issues).map(|s| (*s).clone()).collect();
    let newly_introduced_issues = current_issues.difference(&previous_issues).map(|s| (*s).clone()).collect();

    ScoreDelta {
        previous_total: previous.total_score,
        current_total: current.total_score,
        total_delta,
        direction: direction_of(total_delta),
        significance: ChangeSignificance::from_abs_delta(total_delta.abs()),
        pillar_deltas,
        newly_resolved_issues,
        newly_introduced_issues,
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreTrendPoint {
    pub run_index: usize,
    pub total_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTrendSummary {
    pub points: Vec<ScoreTrendPoint>,
    pub first_score: f64,
    pub last_score: f64,
    pub best_score: f64,
    pub worst_score: f64,
    pub overall_direction: ChangeDirection,
}

/// Builds a trend summary over an ordered sequence of past runs' totals
/// (oldest first). Empty input returns a summary of all zeros with an
/// `Unchanged` direction rather than erroring — a brand-new site has no
/// history yet.
pub fn build_trend_data(history: &[f64]) -> ScoreTrendSummary {
    if history.is_empty() {
        return ScoreTrendSummary {
            points: Vec::new(),
            first_score: 0.0,
            last_score: 0.0,
            best_score: 0.0,
            worst_score: 0.0,
            overall_direction: ChangeDirection::Unchanged,
        };
    }
    let points: Vec<ScoreTrendPoint> = history
        .iter()
        .enumerate()
        .map(|(run_index, &total_score)| ScoreTrendPoint { run_index, total_score })
        .collect();
    let first_score = history[0];
    let last_score = history[history.len() - 1];
    let best_score = history.iter().cloned().fold(f64::MIN, f64::max);
    let worst_score = history.iter().cloned().fold(f64::MAX, f64::min);

    ScoreTrendSummary {
        points,
        first_score,
        last_score,
        best_score,
        worst_score,
        overall_direction: direction_of(last_score - first_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_types::pillar::PillarScore;

    fn score_with(total: f64, technical: f64, issues: Vec<&str>) -> FindableScore {
        FindableScore {
            total_score: total,
            grade: findable_types::score::Grade::from_score(total),
            pillars: vec![PillarScore::evaluated(Pillar::Technical, technical, 20.0, "x", vec![])],
            pillars_evaluated: 1,
            pillars_not_evaluated: 0,
            is_partial: false,
            max_evaluated_points: 20.0,
            evaluated_score_pct: 100.0,
            critical_issues: issues.into_iter().map(|s| s.to_string()).collect(),
            fixes: vec![],
        }
    }

    #[test]
    fn detects_improvement_and_resolved_issue() {
        let previous = score_with(60.0, 50.0, vec!["robots.txt blocks Googlebot"]);
        let current = score_with(75.0, 80.0, vec![]);
        let delta = compare_scores(&previous, &current);
        assert_eq!(delta.direction, ChangeDirection::Improved);
        assert_eq!(delta.significance, ChangeSignificance::Major);
        assert_eq!(delta.newly_resolved_issues, vec!["robots.txt blocks Googlebot".to_string()]);
        assert!(delta.newly_introduced_issues.is_empty());
        assert_eq!(delta.pillar_deltas.len(), 1);
        assert_eq!(delta.pillar_deltas[0].direction, ChangeDirection::Improved);
    }

    #[test]
    fn trend_over_empty_history_is_unchanged() {
        let trend = build_trend_data(&[]);
        assert_eq!(trend.overall_direction, ChangeDirection::Unchanged);
        assert!(trend.points.is_empty());
    }

    #[test]
    fn trend_tracks_best_and_worst() {
        let trend = build_trend_data(&[40.0, 70.0, 55.0, 90.0]);
        assert_eq!(trend.best_score, 90.0);
        assert_eq!(trend.worst_score, 40.0);
        assert_eq!(trend.overall_direction, ChangeDirection::Improved);
    }
}
