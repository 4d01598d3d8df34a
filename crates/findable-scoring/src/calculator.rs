//! The v2 score calculator: composes independently-scored pillars into the
//! final `FindableScore`, and renders the `show_the_math()` trace a report
//! can hand a user to justify the number.
//!
//! Ported in spirit from `TechnicalReadinessScore.show_the_math()` and
//! `TechnicalScoreCalculator.calculate()` in the Python original, generalized
//! from "one technical score" to "N weighted pillars, some of which may not
//! have been evaluated at all" (a site too small to simulate questions
//! against, say, skips the Retrieval pillar rather than faking a zero).

use findable_types::pillar::PillarScore;
use findable_types::score::{FindableScore, Grade};

/// Composes a finished `FindableScore` from every pillar's `PillarScore`,
/// plus the critical issues and suggested fixes gathered across pillar
/// scorers. Pillars that were not evaluated contribute zero points but are
/// excluded from `evaluated_score_pct`, which is the fairer number to show
/// when coverage is partial.
pub fn compose_score(pillars: Vec<PillarScore>, critical_issues: Vec<String>, fixes: Vec<String>) -> FindableScore {
    let total_score: f64 = pillars.iter().map(|p| p.points_earned).sum();
    let pillars_evaluated = pillars.iter().filter(|p| p.evaluated).count();
    let pillars_not_evaluated = pillars.len() - pillars_evaluated;
    let is_partial = pillars_not_evaluated > 0;

    let max_evaluated_points: f64 = pillars.iter().filter(|p| p.evaluated).map(|p| p.max_points).sum();
    let evaluated_points: f64 = pillars.iter().filter(|p| p.evaluated).map(|p| p.points_earned).sum();
    let evaluated_score_pct = if max_evaluated_points > 0.0 {
        evaluated_points / max_evaluated_points * 100.0
    } else {
        0.0
    };

    let grade = Grade::from_score(total_score);

    FindableScore {
        total_score,
        grade,
        pillars,
        pillars_evaluated,
        pillars_not_evaluated,
        is_partial,
        max_evaluated_points,
        evaluated_score_pct,
        critical_issues,
        fixes,
    }
}

/// Renders a plain-text breakdown of how `score` was computed: a banner,
/// the overall total and grade, one line per pillar (and its components),
/// then critical and all-issues sections. Meant for CLI/report output, not
/// machine parsing.
pub fn show_the_math(score: &FindableScore) -> String {
    let mut out = String::new();
    let banner = "=".repeat(60);
    let divider = "-".repeat(60);

    out.push_str(&banner);
    out.push('\n');
    out.push_str("FINDABLE SCORE\n");
    out.push_str(&banner);
    out.push('\n');
    out.push_str(&format!("Total: {:.1}/100 (Grade {:?})\n", score.total_score, score.grade));
    if score.is_partial {
        out.push_str(&format!(
            "Partial result: {}/{} pillars evaluated ({:.1}% of evaluated points earned)\n",
            score.pillars_evaluated,
            score.pillars_evaluated + score.pillars_not_evaluated,
            score.evaluated_score_pct
        ));
    }
    out.push('\n');

    for pillar in &score.pillars {
        out.push_str(&divider);
        out.push('\n');
        if pillar.evaluated {
            out.push_str(&format!(
                "{} — {:.1}/100 raw, weight {:.0}, earned {:.1} points ({:?})\n",
                pillar.name.name(),
                pillar.raw_score,
                pillar.weight,
                pillar.points_earned,
                pillar.level
            ));
        } else {
            out.push_str(&format!("{} — NOT EVALUATED (weight {:.0})\n", pillar.name.name(), pillar.weight));
        }
        out.push_str(&format!("  {}\n", pillar.explanation));
        for component in &pillar.components {
            let icon = match component.level {
                findable_types::analyzer::ProgressLevel::Full => "[+]",
                findable_types::analyzer::ProgressLevel::Partial => "[~]",
                findable_types::analyzer::ProgressLevel::Limited => "[-]",
            };
            out.push_str(&format!(
                "    {icon} {}: {:.1} raw x {:.2} weight = {:.1} — {}\n",
                component.name, component.raw_score, component.weight, component.weighted_score, component.explanation
            ));
        }
        out.push('\n');
    }

    out.push_str(&divider);
    out.push('\n');
    if score.critical_issues.is_empty() {
        out.push_str("No critical issues.\n");
    } else {
        out.push_str("CRITICAL ISSUES:\n");
        for issue in &score.critical_issues {
            out.push_str(&format!("  ! {issue}\n"));
        }
    }
    out.push('\n');
    if !score.fixes.is_empty() {
        out.push_str("SUGGESTED FIXES:\n");
        for fix in &score.fixes {
            out.push_str(&format!("  - {fix}\n"));
        }
    }
    out.push_str(&banner);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_types::analyzer::PillarComponent;
    use findable_types::pillar::Pillar;

    #[test]
    fn full_coverage_sums_to_raw_total() {
        let pillars = vec![
            PillarScore::evaluated(
                Pillar::Technical,
                90.0,
                20.0,
                "good",
                vec![PillarComponent::new("x", 90.0, 1.0, "ok", serde_json::json!({}))],
            ),
            PillarScore::evaluated(Pillar::Structure, 70.0, 20.0, "ok", vec![]),
            PillarScore::evaluated(Pillar::Schema, 60.0, 15.0, "ok", vec![]),
            PillarScore::evaluated(Pillar::Authority, 50.0, 15.0, "ok", vec![]),
            PillarScore::evaluated(Pillar::Retrieval, 80.0, 20.0, "ok", vec![]),
            PillarScore::evaluated(Pillar::Coverage, 100.0, 10.0, "ok", vec![]),
        ];
        let score = compose_score(pillars, vec![], vec![]);
        assert!(!score.is_partial);
        assert_eq!(score.pillars_evaluated, 6);
        let expected = 90.0_f64 * 0.2 + 70.0 * 0.2 + 60.0 * 0.15 + 50.0 * 0.15 + 80.0 * 0.2 + 100.0 * 0.1;
        assert!((score.total_score - expected).abs() < 1e-9);
    }

    #[test]
    fn partial_coverage_flags_evaluated_pct() {
        let pillars = vec![
            PillarScore::evaluated(Pillar::Technical, 80.0, 20.0, "ok", vec![]),
            PillarScore::not_evaluated(Pillar::Retrieval, 20.0, "no simulation run"),
        ];
        let score = compose_score(pillars, vec![], vec![]);
        assert!(score.is_partial);
        assert_eq!(score.pillars_not_evaluated, 1);
        assert!((score.evaluated_score_pct - 80.0).abs() < 1e-9);
    }

    #[test]
    fn show_the_math_renders_banner_and_pillars() {
        let pillars = vec![PillarScore::evaluated(Pillar::Technical, 90.0, 20.0, "good", vec![])];
        let score = compose_score(pillars, vec!["robots.txt blocks Googlebot".to_string()], vec!["allow Googlebot".to_string()]);
        let text = show_the_math(&score);
        assert!(text.contains("FINDABLE SCORE"));
        assert!(text.contains("technical"));
        assert!(text.contains("CRITICAL ISSUES"));
        assert!(text.contains("robots.txt blocks Googlebot"));
    }
}
