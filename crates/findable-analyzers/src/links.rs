//! Internal link density and anchor-text quality analysis.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const OPTIMAL_MIN: usize = 5;
const OPTIMAL_MAX: usize = 15;
const MIN_LINKS_PER_PAGE: usize = 5;
const MAX_LINKS_PER_PAGE: usize = 50;
const MIN_ANCHOR_LENGTH: usize = 3;

const GENERIC_ANCHORS: &[&str] = &[
    "click here",
    "click",
    "here",
    "read more",
    "more",
    "learn more",
    "continue",
    "link",
    "this",
    "this link",
    "see more",
    "view more",
    "details",
    "info",
    "read",
];

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkInfo {
    pub href: String,
    pub anchor_text: String,
    pub is_internal: bool,
    pub is_navigation: bool,
    pub is_in_content: bool,
    pub has_good_anchor: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkAnalysis {
    pub total_links: usize,
    pub internal_links: usize,
    pub external_links: usize,
    pub content_internal_links: usize,
    pub nav_links: usize,
    pub good_anchor_count: usize,
    pub link_density: f64,
    pub density_level: String,
    pub score: f64,
    pub issues: Vec<String>,
    pub unique_anchors: usize,
    pub empty_anchors: usize,
    pub generic_anchors: usize,
}

/// `word_count` feeds the per-1000-word density metric; `page_url` and
/// `base_domain` decide internal vs external.
pub fn analyze_links(html: &str, page_url: &str, word_count: usize) -> LinkAnalysis {
    let doc = Html::parse_document(html);
    let base_domain = domain_of(page_url);
    let base_url = url::Url::parse(page_url).ok();

    let mut result = LinkAnalysis {
        score: 100.0,
        ..Default::default()
    };
    let mut seen_anchors = HashSet::new();
    let mut links = Vec::new();

    for a in doc.select(&ANCHOR_SELECTOR) {
        let href = a.value().attr("href").unwrap_or("").to_string();
        if href.is_empty() || href == "#" {
            continue;
        }
        let anchor_text: String = a.text().collect::<Vec<_>>().join("").trim().to_string();

        let is_internal = is_internal_link(&href, &base_domain, base_url.as_ref());
        let is_nav = is_in_navigation(a);
        let is_in_content = is_in_content_area(a);
        let has_good_anchor = is_good_anchor(&anchor_text);

        result.total_links += 1;
        if is_internal {
            result.internal_links += 1;
            if is_in_content {
                result.content_internal_links += 1;
            }
            if is_nav {
                result.nav_links += 1;
            }
        } else {
            result.external_links += 1;
        }
        if has_good_anchor {
            result.good_anchor_count += 1;
        }

        if !anchor_text.is_empty() {
            let lower = anchor_text.to_ascii_lowercase();
            if seen_anchors.insert(lower.clone()) {
                result.unique_anchors += 1;
            }
            if GENERIC_ANCHORS.contains(&lower.as_str()) {
                result.generic_anchors += 1;
            }
        } else {
            result.empty_anchors += 1;
        }

        links.push(LinkInfo {
            href,
            anchor_text: truncate(&anchor_text, 200),
            is_internal,
            is_navigation: is_nav,
            is_in_content,
            has_good_anchor,
        });
    }

    if word_count > 0 {
        result.link_density = (result.internal_links as f64 / word_count as f64) * 1000.0;
    }
    result.density_level = if result.internal_links < OPTIMAL_MIN {
        "low".to_string()
    } else if result.internal_links > OPTIMAL_MAX {
        "high".to_string()
    } else {
        "optimal".to_string()
    };

    let (score, issues) = score_links(&result);
    result.score = score;
    result.issues = issues;
    result
}

fn domain_of(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .map(|h| strip_www(&h))
        .unwrap_or_default()
}

fn strip_www(host: &str) -> String {
    host.strip_prefix("www.").unwrap_or(host).to_ascii_lowercase()
}

fn is_internal_link(href: &str, base_domain: &str, page_url: Option<&url::Url>) -> bool {
    if href.starts_with('/') || href.starts_with('#') || href.starts_with('?') {
        return true;
    }
    if href.starts_with("mailto:") || href.starts_with("tel:") {
        return false;
    }
    let Some(page_url) = page_url else { return false };
    match page_url.join(href) {
        Ok(resolved) => resolved
            .host_str()
            .map(|h| strip_www(h) == base_domain)
            .unwrap_or(false),
        Err(_) => false,
    }
}

fn is_in_navigation(el: ElementRef) -> bool {
    el.ancestors().any(|a| {
        ElementRef::wrap(a)
            .map(|e| {
                let name = e.value().name();
                if matches!(name, "nav" | "header" | "footer") {
                    return true;
                }
                let class = e.value().attr("class").unwrap_or("").to_ascii_lowercase();
                class.contains("nav") || class.contains("menu") || class.contains("sidebar")
            })
            .unwrap_or(false)
    })
}

fn is_in_content_area(el: ElementRef) -> bool {
    el.ancestors().any(|a| {
        ElementRef::wrap(a)
            .map(|e| {
                let name = e.value().name();
                if matches!(name, "main" | "article") {
                    return true;
                }
                if e.value().attr("id") == Some("content") {
                    return true;
                }
                if e.value().attr("role") == Some("main") {
                    return true;
                }
                e.value()
                    .attr("class")
                    .map(|c| c.to_ascii_lowercase().contains("content"))
                    .unwrap_or(false)
            })
            .unwrap_or(false)
    })
}

fn is_good_anchor(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let lower = text.to_ascii_lowercase();
    if lower.len() < MIN_ANCHOR_LENGTH {
        return false;
    }
    if GENERIC_ANCHORS.contains(&lower.as_str()) {
        return false;
    }
    !(lower.starts_with("http://") || lower.starts_with("https://"))
}

fn score_links(analysis: &LinkAnalysis) -> (f64, Vec<String>) {
    let mut score = 100.0;
    let mut issues = Vec::new();

    if analysis.internal_links < MIN_LINKS_PER_PAGE {
        let penalty = (MIN_LINKS_PER_PAGE - analysis.internal_links) as f64 * 5.0;
        score -= penalty;
        issues.push(format!(
            "Low internal link count ({}). Target: {}-{} per page.",
            analysis.internal_links, OPTIMAL_MIN, OPTIMAL_MAX
        ));
    }
    if analysis.internal_links > MAX_LINKS_PER_PAGE {
        let penalty = ((analysis.internal_links - MAX_LINKS_PER_PAGE) as f64 * 0.5).min(20.0);
        score -= penalty;
        issues.push(format!(
            "High internal link count ({}). May dilute link value.",
            analysis.internal_links
        ));
    }
    if analysis.internal_links > 0 && analysis.content_internal_links == 0 {
        score -= 15.0;
        issues.push(
            "No internal links in main content. All internal links are in navigation."
                .to_string(),
        );
    }
    if analysis.empty_anchors > 3 {
        let penalty = (analysis.empty_anchors as f64 * 2.0).min(10.0);
        score -= penalty;
        issues.push(format!(
            "{} links have no anchor text. This hurts AI understanding.",
            analysis.empty_anchors
        ));
    }
    if analysis.generic_anchors > 5 {
        let penalty = (analysis.generic_anchors as f64).min(10.0);
        score -= penalty;
        issues.push(format!(
            "{} links use generic anchor text (e.g., 'click here'). Use descriptive anchors.",
            analysis.generic_anchors
        ));
    }
    if analysis.total_links > 0 {
        let good_ratio = analysis.good_anchor_count as f64 / analysis.total_links as f64;
        if good_ratio >= 0.8 {
            score = (score + 5.0).min(100.0);
        }
    }

    (score.max(0.0), issues)
}

fn truncate(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_internal_and_external() {
        let html = r#"<html><body><main>
            <a href="/about">About us page</a>
            <a href="https://other.com">Other</a>
        </main></body></html>"#;
        let r = analyze_links(html, "https://example.com/", 500);
        assert_eq!(r.internal_links, 1);
        assert_eq!(r.external_links, 1);
        assert_eq!(r.content_internal_links, 1);
    }

    #[test]
    fn generic_anchors_penalized() {
        let html = r#"<html><body><main>
            <a href="/a">click here</a><a href="/b">click here</a>
            <a href="/c">click here</a><a href="/d">click here</a>
            <a href="/e">click here</a><a href="/f">click here</a>
        </main></body></html>"#;
        let r = analyze_links(html, "https://example.com/", 500);
        assert!(r.generic_anchors > 5);
        assert!(r.score < 100.0);
    }

    #[test]
    fn nav_links_not_counted_as_content() {
        let html = r#"<html><body><nav><a href="/x">Home</a></nav><main><p>text</p></main></body></html>"#;
        let r = analyze_links(html, "https://example.com/", 500);
        assert_eq!(r.nav_links, 1);
        assert_eq!(r.content_internal_links, 0);
    }
}
