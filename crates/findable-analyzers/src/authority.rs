//! Authority-signal detection: author attribution, stated credentials,
//! citation quality, original-data presence and visible dates. These are
//! the signals AI answer engines weigh when deciding whether to trust and
//! cite a source.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

const CREDENTIAL_PATTERNS: &[&str] = &[
    "phd", "ph.d", "md", "m.d", "certified", "licensed", "years of experience",
    "years experience", "board-certified", "professor", "researcher",
];

const ORIGINAL_DATA_PATTERNS: &[&str] = &[
    "our research",
    "our study",
    "we surveyed",
    "in our analysis",
    "we analyzed",
    "proprietary data",
    "our data shows",
    "according to our",
];

const AUTHORITATIVE_DOMAINS: &[&str] = &[
    ".gov", ".edu", "wikipedia.org", "nature.com", "who.int", "nih.gov", "ncbi.nlm.nih.gov",
];

static AUTHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[rel="author"], .author, .byline, [itemprop="author"]"#).unwrap());
static TIME_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("time[datetime]").unwrap());
static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("table").unwrap());
static CHART_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)chart|graph|figure\s*\d|data-chart"#).unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorityAnalysis {
    pub has_author: bool,
    pub author_name: Option<String>,
    pub has_credentials: bool,
    pub total_citations: usize,
    pub authoritative_citations: usize,
    pub has_original_data: bool,
    pub has_published_date: bool,
    pub has_modified_date: bool,
    pub score: f64,
    pub level: String,
    pub issues: Vec<String>,
}

pub fn analyze_authority(
    html: &str,
    published_date: Option<&str>,
    modified_date: Option<&str>,
) -> AuthorityAnalysis {
    let doc = Html::parse_document(html);
    let mut result = AuthorityAnalysis::default();
    let body_text: String = doc
        .select(&Selector::parse("body").unwrap())
        .next()
        .map(|b| b.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let body_lower = body_text.to_ascii_lowercase();

    if let Some(el) = doc.select(&AUTHOR_SELECTOR).next() {
        let text: String = el.text().collect::<Vec<_>>().join(" ").trim().to_string();
        if !text.is_empty() {
            result.has_author = true;
            result.author_name = Some(text);
        }
    }
    result.has_credentials = CREDENTIAL_PATTERNS.iter().any(|p| body_lower.contains(p));
    result.has_original_data = ORIGINAL_DATA_PATTERNS.iter().any(|p| body_lower.contains(p))
        || doc.select(&TABLE_SELECTOR).next().is_some()
        || CHART_HINT.is_match(&body_text);

    result.has_published_date = published_date.is_some() || doc.select(&TIME_SELECTOR).next().is_some();
    result.has_modified_date = modified_date.is_some();

    for link in doc.select(&LINK_SELECTOR) {
        let Some(href) = link.value().attr("href") else { continue };
        if href.starts_with('#') || href.starts_with('/') {
            continue;
        }
        if let Ok(url) = url::Url::parse(href) {
            if let Some(host) = url.host_str() {
                result.total_citations += 1;
                if AUTHORITATIVE_DOMAINS.iter().any(|d| host.contains(d)) {
                    result.authoritative_citations += 1;
                }
            }
        }
    }

    result.score = score(&result);
    result.level = if result.score >= 80.0 {
        "good".to_string()
    } else if result.score >= 40.0 {
        "warning".to_string()
    } else {
        "critical".to_string()
    };

    if !result.has_author {
        result.issues.push("No author attribution found".to_string());
    }
    if !result.has_published_date {
        result.issues.push("No visible publication date".to_string());
    }
    if result.authoritative_citations == 0 && result.total_citations > 0 {
        result
            .issues
            .push("Citations present but none point to authoritative sources (.gov/.edu/major publishers)".to_string());
    }
    result
}

fn score(result: &AuthorityAnalysis) -> f64 {
    let mut score = 0.0;
    if result.has_author {
        score += 25.0;
    }
    if result.has_credentials {
        score += 15.0;
    }
    if result.has_published_date {
        score += 15.0;
    }
    if result.has_modified_date {
        score += 5.0;
    }
    if result.has_original_data {
        score += 15.0;
    }
    if result.authoritative_citations > 0 {
        score += (result.authoritative_citations as f64 * 5.0).min(25.0);
    }
    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_signals_scores_low() {
        let r = analyze_authority("<html><body><p>hello</p></body></html>", None, None);
        assert!(r.score < 40.0);
        assert!(!r.has_author);
    }

    #[test]
    fn author_and_citations_score_higher() {
        let html = r#"<html><body>
            <span class="byline">Jane Doe, PhD</span>
            <time datetime="2024-01-01">Jan 1, 2024</time>
            <p>According to our research, this works.</p>
            <a href="https://www.nih.gov/study">study</a>
        </body></html>"#;
        let r = analyze_authority(html, Some("2024-01-01"), None);
        assert!(r.has_author);
        assert!(r.has_credentials);
        assert!(r.has_original_data);
        assert_eq!(r.authoritative_citations, 1);
        assert!(r.score > 50.0);
    }
}
