//! Coverage pillar. Spec.md §4.10 defines this pillar's input as
//! `coverage_score` — the fraction of simulated questions that retrieved at
//! least one chunk above a relevance floor — so that's the primary
//! component here. It's blended with two supplemented signals this crate
//! also tracks: the `findable-analyzers::topic_clusters` pillar-and-cluster
//! model, and the fraction of discovered pages the crawl actually reached.

use findable_analyzers::TopicClusterAnalysis;
use findable_types::analyzer::{Issue, PillarComponent, SeverityLevel};
use findable_types::pillar::{Pillar, PillarScore};
use serde_json::json;

/// Weights used when a simulation ran and `retrieval_coverage_score` is
/// `Some` — the spec-defined retrieval-coverage signal is given the
/// majority weight, with the topic-cluster and crawl-completeness signals
/// (this crate's own supplemented additions) filling the rest.
const RETRIEVAL_COVERAGE_WEIGHT: f64 = 0.5;
const CLUSTER_WEIGHT_WITH_RETRIEVAL: f64 = 0.3;
const CRAWL_COMPLETENESS_WEIGHT_WITH_RETRIEVAL: f64 = 0.2;

/// Weights used when no simulation ran (`retrieval_coverage_score` is
/// `None`) — the pillar falls back to the two supplemented signals alone,
/// renormalized to sum to 1.0.
const CLUSTER_WEIGHT_NO_RETRIEVAL: f64 = 0.6;
const CRAWL_COMPLETENESS_WEIGHT_NO_RETRIEVAL: f64 = 0.4;

pub struct CoverageResult {
    pub pillar: PillarScore,
    pub issues: Vec<Issue>,
}

/// `crawl_completeness` is the fraction (0.0-1.0) of discovered sitemap/link
/// URLs that were actually fetched and analyzed during the run.
/// `retrieval_coverage_score` is `SimulationResult.coverage_score` (0.0-1.0,
/// §4.10's spec-defined Coverage input) when a simulation ran, else `None`.
pub fn score_coverage(
    analysis: &TopicClusterAnalysis,
    crawl_completeness: f64,
    retrieval_coverage_score: Option<f64>,
    pillar_weight: f64,
) -> CoverageResult {
    let (cluster_weight, crawl_weight) = if retrieval_coverage_score.is_some() {
        (CLUSTER_WEIGHT_WITH_RETRIEVAL, CRAWL_COMPLETENESS_WEIGHT_WITH_RETRIEVAL)
    } else {
        (CLUSTER_WEIGHT_NO_RETRIEVAL, CRAWL_COMPLETENESS_WEIGHT_NO_RETRIEVAL)
    };

    let cluster_component = PillarComponent::new(
        "Topic Cluster Structure",
        analysis.cluster_score,
        cluster_weight,
        format!(
            "{} cluster(s) found covering {} pillar page(s), {} orphan(s)",
            analysis.clusters.len(),
            analysis.pillar_pages.len(),
            analysis.orphan_pages.len()
        ),
        json!({
            "cluster_count": analysis.clusters.len(),
            "orphan_count": analysis.orphan_pages.len(),
            "thin_content_count": analysis.thin_pages.len(),
        }),
    );

    let crawl_score = (crawl_completeness * 100.0).clamp(0.0, 100.0);
    let crawl_component = PillarComponent::new(
        "Crawl Completeness",
        crawl_score,
        crawl_weight,
        format!("{:.0}% of discovered URLs were crawled within the run's scope", crawl_completeness * 100.0),
        json!({}),
    );

    let mut components = vec![cluster_component, crawl_component];
    let mut raw_score = analysis.cluster_score * cluster_weight + crawl_score * crawl_weight;

    if let Some(retrieval_coverage) = retrieval_coverage_score {
        let retrieval_score = (retrieval_coverage * 100.0).clamp(0.0, 100.0);
        components.insert(
            0,
            PillarComponent::new(
                "Retrieval Coverage",
                retrieval_score,
                RETRIEVAL_COVERAGE_WEIGHT,
                format!(
                    "{:.0}% of simulated questions retrieved at least one chunk above the relevance floor",
                    retrieval_coverage * 100.0
                ),
                json!({}),
            ),
        );
        raw_score += retrieval_score * RETRIEVAL_COVERAGE_WEIGHT;
    }

    let mut issues = Vec::new();
    if !analysis.orphan_pages.is_empty() {
        issues.push(Issue::new(
            format!("{} orphan page(s) have no internal links pointing to them", analysis.orphan_pages.len()),
            SeverityLevel::Warning,
        ));
    }
    if !analysis.thin_pages.is_empty() {
        issues.push(Issue::new(
            format!("{} page(s) have thin content (under 300 words)", analysis.thin_pages.len()),
            SeverityLevel::Warning,
        ));
    }
    if crawl_completeness < 0.5 {
        issues.push(Issue::new(
            "Less than half of discovered URLs were crawled; coverage score may understate the full site".to_string(),
            SeverityLevel::Warning,
        ));
    }
    if let Some(retrieval_coverage) = retrieval_coverage_score {
        if retrieval_coverage < 0.5 {
            issues.push(Issue::new(
                "Less than half of simulated questions retrieved a relevant chunk".to_string(),
                SeverityLevel::Warning,
            ));
        }
    }

    let explanation = format!(
        "{} topic cluster(s), {:.0}% crawl completeness{}, scoring {:.0}/100",
        analysis.clusters.len(),
        crawl_completeness * 100.0,
        retrieval_coverage_score
            .map(|r| format!(", {:.0}% retrieval coverage", r * 100.0))
            .unwrap_or_default(),
        raw_score
    );

    let pillar = PillarScore::evaluated(Pillar::Coverage, raw_score, pillar_weight, explanation, components);

    CoverageResult { pillar, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_analyzers::{analyze_topic_clusters, PageInput};

    #[test]
    fn full_crawl_and_good_clusters_scores_high() {
        let pages = vec![
            PageInput {
                url: "https://example.com/".to_string(),
                word_count: 2500,
                title: "Home".to_string(),
                internal_links: vec!["https://example.com/guide-a".to_string(), "https://example.com/guide-b".to_string()],
            },
            PageInput {
                url: "https://example.com/guide-a".to_string(),
                word_count: 900,
                title: "Guide A".to_string(),
                internal_links: vec!["https://example.com/".to_string()],
            },
            PageInput {
                url: "https://example.com/guide-b".to_string(),
                word_count: 900,
                title: "Guide B".to_string(),
                internal_links: vec!["https://example.com/".to_string()],
            },
        ];
        let analysis = analyze_topic_clusters(&pages);
        let result = score_coverage(&analysis, 1.0, None, 10.0);
        assert!(result.pillar.evaluated);
    }

    #[test]
    fn retrieval_coverage_raises_a_dedicated_component_when_present() {
        let pages = vec![PageInput {
            url: "https://example.com/".to_string(),
            word_count: 2500,
            title: "Home".to_string(),
            internal_links: vec![],
        }];
        let analysis = analyze_topic_clusters(&pages);

        let without = score_coverage(&analysis, 1.0, None, 10.0);
        assert_eq!(without.pillar.components.len(), 2);

        let high_retrieval = score_coverage(&analysis, 1.0, Some(0.9), 10.0);
        let low_retrieval = score_coverage(&analysis, 1.0, Some(0.1), 10.0);
        assert_eq!(high_retrieval.pillar.components.len(), 3);
        assert_eq!(high_retrieval.pillar.components[0].name, "Retrieval Coverage");
        // isolates the retrieval-coverage signal's effect: same cluster/crawl
        // weights on both sides, only `retrieval_coverage_score` differs.
        assert!(high_retrieval.pillar.raw_score > low_retrieval.pillar.raw_score);
    }

    #[test]
    fn low_retrieval_coverage_raises_a_warning_issue() {
        let pages = vec![PageInput {
            url: "https://example.com/".to_string(),
            word_count: 2500,
            title: "Home".to_string(),
            internal_links: vec![],
        }];
        let analysis = analyze_topic_clusters(&pages);
        let result = score_coverage(&analysis, 1.0, Some(0.2), 10.0);
        assert!(result.issues.iter().any(|i| i.message.contains("simulated questions")));
    }
}
