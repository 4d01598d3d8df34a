//! Topic cluster and pillar-page detection across a whole crawl.
//!
//! Unlike the other analyzers in this crate, this one operates on the full
//! set of crawled pages rather than a single page: clustered content (a
//! pillar page linking to deep-dive cluster pages, linking back) is a
//! structural signal AI systems use to infer topical authority.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

const PILLAR_MIN_WORDS: usize = 2000;
const CLUSTER_MIN_WORDS: usize = 800;
const MIN_CLUSTER_SIZE: usize = 3;
const MIN_INTERNAL_LINKS_PILLAR: usize = 5;
const THIN_WORD_THRESHOLD: usize = 300;

#[derive(Debug, Clone)]
pub struct PageInput {
    pub url: String,
    pub word_count: usize,
    pub title: String,
    pub internal_links: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Pillar,
    Cluster,
    Orphan,
    Thin,
    Normal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicCluster {
    pub id: String,
    pub pillar_url: String,
    pub pillar_title: String,
    pub cluster_pages: Vec<String>,
    pub bidirectional_links: usize,
    pub total_links: usize,
    pub bidirectional_ratio: f64,
    pub cluster_size: usize,
    pub avg_cluster_word_count: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicClusterAnalysis {
    pub clusters: Vec<TopicCluster>,
    pub cluster_count: usize,
    pub pillar_pages: Vec<String>,
    pub cluster_pages: Vec<String>,
    pub orphan_pages: Vec<String>,
    pub thin_pages: Vec<String>,
    pub total_internal_links: usize,
    pub bidirectional_link_count: usize,
    pub bidirectional_ratio: f64,
    pub avg_internal_links_per_page: f64,
    pub cluster_score: f64,
    pub link_health_score: f64,
    pub total_score: f64,
    pub level: String,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

struct PageInfo {
    word_count: usize,
    title: String,
    outbound: Vec<String>,
    inbound: Vec<String>,
    page_type: PageType,
}

pub fn analyze_topic_clusters(pages: &[PageInput]) -> TopicClusterAnalysis {
    let mut result = TopicClusterAnalysis::default();
    if pages.is_empty() {
        result.level = "critical".to_string();
        result.issues.push("No pages to analyze".to_string());
        return result;
    }

    let mut page_map: BTreeMap<String, PageInfo> = BTreeMap::new();
    for page in pages {
        let url = normalize_url(&page.url);
        if url.is_empty() {
            continue;
        }
        page_map.insert(
            url,
            PageInfo {
                word_count: page.word_count,
                title: page.title.clone(),
                outbound: page.internal_links.iter().map(|l| normalize_url(l)).collect(),
                inbound: Vec::new(),
                page_type: PageType::Normal,
            },
        );
    }

    let inbound_edges: Vec<(String, String)> = page_map
        .iter()
        .flat_map(|(url, info)| {
            info.outbound
                .iter()
                .filter(|target| page_map.contains_key(*target))
                .map(move |target| (target.clone(), url.clone()))
        })
        .collect();
    for (target, source) in inbound_edges {
        if let Some(info) = page_map.get_mut(&target) {
            info.inbound.push(source);
        }
    }

    classify_pages(&mut page_map, &mut result);
    detect_clusters(&page_map, &mut result);
    calculate_link_health(&page_map, &mut result);
    calculate_scores(&page_map, &mut result);
    generate_recommendations(&page_map, &mut result);
    result
}

fn normalize_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    let without_fragment = url.split('#').next().unwrap_or("");
    let without_query = without_fragment.split('?').next().unwrap_or("");
    without_query.trim_end_matches('/').to_ascii_lowercase()
}

fn is_homepage(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let path = parsed.path().trim_matches('/');
            path.is_empty() || matches!(path, "index" | "index.html" | "home")
        }
        Err(_) => false,
    }
}

fn classify_pages(page_map: &mut BTreeMap<String, PageInfo>, result: &mut TopicClusterAnalysis) {
    for (url, page) in page_map.iter_mut() {
        let inbound_count = page.inbound.len();
        let outbound_count = page.outbound.len();

        page.page_type = if page.word_count < THIN_WORD_THRESHOLD {
            result.thin_pages.push(url.clone());
            PageType::Thin
        } else if page.word_count >= PILLAR_MIN_WORDS && outbound_count >= MIN_INTERNAL_LINKS_PILLAR {
            result.pillar_pages.push(url.clone());
            PageType::Pillar
        } else if page.word_count >= CLUSTER_MIN_WORDS
            && page.word_count < PILLAR_MIN_WORDS
            && inbound_count > 0
        {
            result.cluster_pages.push(url.clone());
            PageType::Cluster
        } else if inbound_count == 0 && !is_homepage(url) {
            result.orphan_pages.push(url.clone());
            PageType::Orphan
        } else {
            PageType::Normal
        };
    }
}

fn detect_clusters(page_map: &BTreeMap<String, PageInfo>, result: &mut TopicClusterAnalysis) {
    let mut cluster_id = 0;
    for pillar_url in result.pillar_pages.clone() {
        let Some(pillar) = page_map.get(&pillar_url) else { continue };
        let mut cluster_pages = Vec::new();
        let mut bidirectional = 0usize;

        for target_url in &pillar.outbound {
            let Some(target) = page_map.get(target_url) else { continue };
            let links_back = target.outbound.iter().any(|u| u == &pillar_url);
            if matches!(target.page_type, PageType::Cluster | PageType::Normal) || links_back {
                cluster_pages.push(target_url.clone());
                if links_back {
                    bidirectional += 1;
                }
            }
        }

        if cluster_pages.len() >= MIN_CLUSTER_SIZE {
            cluster_id += 1;
            let word_counts: Vec<usize> = cluster_pages
                .iter()
                .filter_map(|u| page_map.get(u).map(|p| p.word_count))
                .collect();
            let avg_words = if word_counts.is_empty() {
                0.0
            } else {
                word_counts.iter().sum::<usize>() as f64 / word_counts.len() as f64
            };
            let size = cluster_pages.len();

            result.clusters.push(TopicCluster {
                id: format!("cluster_{cluster_id}"),
                pillar_url: pillar_url.clone(),
                pillar_title: pillar.title.clone(),
                cluster_pages,
                bidirectional_links: bidirectional,
                total_links: size,
                bidirectional_ratio: bidirectional as f64 / size as f64,
                cluster_size: size,
                avg_cluster_word_count: avg_words,
            });
        }
    }
    result.cluster_count = result.clusters.len();
}

fn calculate_link_health(page_map: &BTreeMap<String, PageInfo>, result: &mut TopicClusterAnalysis) {
    let mut total_links = 0usize;
    let mut bidirectional_pairs: BTreeSet<(String, String)> = BTreeSet::new();

    for (url, page) in page_map {
        total_links += page.outbound.len();
        for target_url in &page.outbound {
            let Some(target) = page_map.get(target_url) else { continue };
            if target.outbound.iter().any(|u| u == url) {
                let pair = if url < target_url {
                    (url.clone(), target_url.clone())
                } else {
                    (target_url.clone(), url.clone())
                };
                bidirectional_pairs.insert(pair);
            }
        }
    }

    result.total_internal_links = total_links;
    result.bidirectional_link_count = bidirectional_pairs.len();

    if !page_map.is_empty() {
        result.avg_internal_links_per_page = total_links as f64 / page_map.len() as f64;
    }

    let mut pages_with_bidirectional: HashSet<&str> = HashSet::new();
    for (a, b) in &bidirectional_pairs {
        pages_with_bidirectional.insert(a.as_str());
        pages_with_bidirectional.insert(b.as_str());
    }
    if !page_map.is_empty() {
        result.bidirectional_ratio = pages_with_bidirectional.len() as f64 / page_map.len() as f64;
    }
}

fn calculate_scores(page_map: &BTreeMap<String, PageInfo>, result: &mut TopicClusterAnalysis) {
    let total_pages = page_map.len();
    if total_pages == 0 {
        result.level = "critical".to_string();
        return;
    }

    let mut cluster_score = 0.0;
    if result.cluster_count > 0 {
        cluster_score += 30.0;
        let pages_in_clusters = (result.pillar_pages.len() + result.cluster_pages.len()) as f64;
        let coverage = pages_in_clusters / total_pages as f64;
        cluster_score += coverage * 30.0;
        if !result.clusters.is_empty() {
            let avg_bidir = result.clusters.iter().map(|c| c.bidirectional_ratio).sum::<f64>()
                / result.clusters.len() as f64;
            cluster_score += avg_bidir * 40.0;
        }
    } else if total_pages < 10 {
        cluster_score = 50.0;
    }
    result.cluster_score = cluster_score.min(100.0);

    let mut link_score = 50.0;
    let orphan_ratio = result.orphan_pages.len() as f64 / total_pages as f64;
    link_score -= orphan_ratio * 30.0;

    let avg_links = result.avg_internal_links_per_page;
    if (5.0..=15.0).contains(&avg_links) {
        link_score += 25.0;
    } else if (3.0..5.0).contains(&avg_links) || (15.0..=25.0).contains(&avg_links) {
        link_score += 15.0;
    } else if avg_links < 3.0 {
        link_score -= 10.0;
    }
    link_score += result.bidirectional_ratio * 25.0;
    result.link_health_score = link_score.clamp(0.0, 100.0);

    result.total_score = result.cluster_score * 0.6 + result.link_health_score * 0.4;
    result.level = if result.total_score >= 70.0 {
        "good".to_string()
    } else if result.total_score >= 40.0 {
        "warning".to_string()
    } else {
        "critical".to_string()
    };
}

fn generate_recommendations(page_map: &BTreeMap<String, PageInfo>, result: &mut TopicClusterAnalysis) {
    let total_pages = page_map.len();

    if result.cluster_count == 0 && total_pages >= 10 {
        result
            .issues
            .push("No topic clusters detected. Content appears disconnected.".to_string());
        result.recommendations.push(
            "Create pillar pages (2000+ words) that comprehensively cover your main topics, \
             then link them to related cluster pages (1000-2000 words each)."
                .to_string(),
        );
    }

    if result.bidirectional_ratio < 0.3 && total_pages >= 5 {
        result.issues.push(format!(
            "Only {:.0}% of pages have bidirectional links. AI systems use link patterns to understand topic relationships.",
            result.bidirectional_ratio * 100.0
        ));
        result.recommendations.push(
            "Add links from cluster pages back to their pillar pages. Each article should link to its parent topic guide."
                .to_string(),
        );
    }

    if !result.orphan_pages.is_empty() {
        let orphan_count = result.orphan_pages.len();
        result.issues.push(format!(
            "{orphan_count} orphan page(s) with no inbound links. These are invisible to AI crawlers following links."
        ));
        if orphan_count <= 5 {
            result.recommendations.push(format!(
                "Add internal links to these orphan pages: {}",
                result.orphan_pages.join(", ")
            ));
        } else {
            result.recommendations.push(format!(
                "Add internal links to {orphan_count} orphan pages. Start with the most important content."
            ));
        }
    }

    if !result.thin_pages.is_empty() {
        let thin_count = result.thin_pages.len();
        if thin_count as f64 > total_pages as f64 * 0.2 {
            result.issues.push(format!(
                "{} pages ({:.0}%) have thin content (<300 words). AI systems prefer substantial content.",
                thin_count,
                thin_count as f64 / total_pages as f64 * 100.0
            ));
            result.recommendations.push(
                "Expand thin pages to at least 800 words, or consolidate them into comprehensive guides."
                    .to_string(),
            );
        }
    }

    if result.avg_internal_links_per_page < 3.0 {
        result.issues.push(format!(
            "Average {:.1} internal links per page. Target is 5-15 for good discoverability.",
            result.avg_internal_links_per_page
        ));
        result.recommendations.push(
            "Add contextual internal links within your content. Link to related articles when mentioning relevant topics."
                .to_string(),
        );
    }

    for cluster in &result.clusters {
        if cluster.bidirectional_ratio < 0.5 {
            result.recommendations.push(format!(
                "Cluster '{}' has {:.0}% bidirectional linking. Add links from cluster pages back to the pillar.",
                truncate(&cluster.pillar_title, 50),
                cluster.bidirectional_ratio * 100.0
            ));
        }
    }
}

fn truncate(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(url: &str, words: usize, links: &[&str]) -> PageInput {
        PageInput {
            url: url.to_string(),
            word_count: words,
            title: format!("Title for {url}"),
            internal_links: links.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn empty_pages_is_critical() {
        let r = analyze_topic_clusters(&[]);
        assert_eq!(r.level, "critical");
    }

    #[test]
    fn detects_pillar_and_cluster() {
        let pages = vec![
            page(
                "https://example.com/guide",
                2500,
                &[
                    "https://example.com/a",
                    "https://example.com/b",
                    "https://example.com/c",
                    "https://example.com/d",
                    "https://example.com/e",
                ],
            ),
            page("https://example.com/a", 1000, &["https://example.com/guide"]),
            page("https://example.com/b", 1000, &["https://example.com/guide"]),
            page("https://example.com/c", 1000, &["https://example.com/guide"]),
            page("https://example.com/d", 1000, &[]),
            page("https://example.com/e", 1000, &[]),
        ];
        let r = analyze_topic_clusters(&pages);
        assert_eq!(r.pillar_pages.len(), 1);
        assert_eq!(r.cluster_count, 1);
        assert!(r.clusters[0].bidirectional_links >= 3);
    }

    #[test]
    fn orphan_pages_detected() {
        let pages = vec![
            page("https://example.com/", 500, &["https://example.com/a"]),
            page("https://example.com/a", 500, &[]),
            page("https://example.com/orphan", 500, &[]),
        ];
        let r = analyze_topic_clusters(&pages);
        assert!(r.orphan_pages.contains(&"https://example.com/orphan".to_string()));
        assert!(!r.orphan_pages.contains(&"https://example.com/".to_string()));
    }
}
