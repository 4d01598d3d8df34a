//! Crawl-time data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Editorial classification of a crawled page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Docs,
    Marketing,
}

/// Path prefixes that mark a page as `docs`.
pub const DOCS_PATH_PREFIXES: &[&str] = &[
    "/docs",
    "/documentation",
    "/guide",
    "/tutorial",
    "/api-reference",
    "/reference",
    "/sdk",
    "/manual",
    "/getting-started",
    "/quickstart",
    "/how-to",
];

/// Host prefixes that mark a page as `docs`.
pub const DOCS_HOST_PREFIXES: &[&str] = &[
    "docs.", "help.", "developer.", "developers.", "support.", "guide.", "learn.",
];

/// Classify a page's surface from its final URL path and host.
pub fn classify_surface(host: &str, path: &str) -> Surface {
    let path_lower = path.to_ascii_lowercase();
    if DOCS_PATH_PREFIXES
        .iter()
        .any(|p| path_lower.starts_with(p))
    {
        return Surface::Docs;
    }
    let host_lower = host.to_ascii_lowercase();
    if DOCS_HOST_PREFIXES.iter().any(|p| host_lower.starts_with(p)) {
        return Surface::Docs;
    }
    Surface::Marketing
}

/// A single crawled page, owned by its `CrawlResult`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlPage {
    pub url: String,
    pub final_url: String,
    pub title: Option<String>,
    pub html: String,
    pub content_type: Option<String>,
    pub status_code: u16,
    pub depth: u32,
    pub fetch_time_ms: u64,
    pub fetched_at: DateTime<Utc>,
    pub links_found: usize,
    pub surface: Surface,
}

/// The outcome of a full BFS crawl of one domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub domain: String,
    pub start_url: String,
    pub pages: Vec<CrawlPage>,
    pub urls_discovered: usize,
    pub urls_crawled: usize,
    pub urls_skipped: usize,
    pub urls_failed: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub robots_respected: bool,
    pub max_depth_reached: u32,
    pub docs_pages_crawled: usize,
    pub marketing_pages_crawled: usize,
    pub docs_surface_detected: bool,
}

impl CrawlResult {
    /// Invariant checked by the spider and re-verified here: every page's
    /// depth is within the configured bound and the page count is too.
    pub fn respects_limits(&self, max_pages: usize, max_depth: u32) -> bool {
        self.pages.len() <= max_pages && self.pages.iter().all(|p| p.depth <= max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_docs_by_path() {
        assert_eq!(classify_surface("example.com", "/docs/start"), Surface::Docs);
        assert_eq!(classify_surface("example.com", "/api-reference/v1"), Surface::Docs);
    }

    #[test]
    fn classifies_docs_by_host() {
        assert_eq!(classify_surface("help.example.com", "/"), Surface::Docs);
        assert_eq!(classify_surface("developers.example.com", "/anything"), Surface::Docs);
    }

    #[test]
    fn defaults_to_marketing() {
        assert_eq!(classify_surface("example.com", "/pricing"), Surface::Marketing);
    }
}
