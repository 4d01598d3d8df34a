//! Per-page analyzer outputs combined into one site-level `PillarScore`.
//!
//! `findable-scoring`'s Structure/Schema/Authority scorers each take a
//! single analyzer struct (they're defined per-page, per spec.md §4.6).
//! A site audits many pages, so this module picks the page whose raw
//! `.score` is closest to the site mean as the *representative* page (its
//! components/issues explain the number), then overrides the pillar's
//! `raw_score`/`points_earned`/`level` with the true site-wide mean so the
//! number itself isn't skewed by whichever single page happened to be
//! picked.

use findable_types::analyzer::ProgressLevel;
use findable_types::pillar::PillarScore;

/// Index of the element in `scores` closest to their mean, used to pick a
/// representative page's analyzer output for a site-level pillar.
pub fn closest_to_mean(scores: &[f64]) -> usize {
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    scores
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (*a - mean).abs().partial_cmp(&(*b - mean).abs()).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Overrides `pillar`'s `raw_score`/`points_earned`/`level` with the true
/// site mean, after a per-representative-page scorer already built its
/// components/explanation.
pub fn apply_site_mean(mut pillar: PillarScore, site_mean: f64, pages_sampled: usize, representative_url: &str) -> PillarScore {
    let site_mean = site_mean.clamp(0.0, 100.0);
    pillar.raw_score = site_mean;
    pillar.points_earned = site_mean / 100.0 * pillar.weight;
    pillar.level = ProgressLevel::from_score(site_mean);
    pillar.explanation = format!(
        "{} (site mean across {pages_sampled} page(s); representative page: {representative_url})",
        pillar.explanation
    );
    pillar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_page_closest_to_the_mean() {
        let scores = vec![10.0, 50.0, 90.0];
        assert_eq!(closest_to_mean(&scores), 1);
    }

    #[test]
    fn single_page_is_its_own_mean() {
        assert_eq!(closest_to_mean(&[42.0]), 0);
    }
}
