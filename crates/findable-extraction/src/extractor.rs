//! Per-page and per-crawl content extraction.

use crate::cleaner::clean_html;
use crate::metadata::extract_metadata;
use chrono::Utc;
use findable_types::crawl::CrawlPage;
use findable_types::extraction::ExtractedPage;
use std::collections::BTreeSet;
use tracing::debug;

/// Extraction behaviour knobs.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub min_content_length: usize,
    pub max_content_length: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_content_length: 50,
            max_content_length: 100_000,
        }
    }
}

/// Aggregate extraction stats across a crawl.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ExtractionResult {
    pub domain: String,
    pub pages: Vec<ExtractedPage>,
    pub total_pages: usize,
    pub total_words: usize,
    pub extraction_errors: usize,
    pub avg_word_count: f64,
    pub schema_types_found: Vec<String>,
}

pub struct ContentExtractor {
    config: ExtractorConfig,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl ContentExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Clean and extract metadata for a single crawled page. Returns `None`
    /// when the page has no HTML or its main content falls under the
    /// configured minimum length (a signal the page is boilerplate-only,
    /// e.g. a redirect stub or an error page rendered with HTTP 200).
    pub fn extract_page(&self, page: &CrawlPage) -> Option<ExtractedPage> {
        if page.html.is_empty() {
            return None;
        }

        let cleaned = clean_html(&page.html);
        if cleaned.main_content.len() < self.config.min_content_length {
            debug!(url = %page.url, "page below minimum content length, skipping");
            return None;
        }

        let main_content = truncate(&cleaned.main_content, self.config.max_content_length);
        let full_text = truncate(&cleaned.full_text, self.config.max_content_length);
        let metadata = extract_metadata(&page.html, Some(&page.url));
        let title = page.title.clone().or_else(|| metadata.title.clone());

        Some(ExtractedPage::new(
            page.url.clone(),
            title,
            main_content,
            full_text,
            metadata,
            page.depth,
            page.fetched_at,
            page.html.len(),
        ))
    }

    /// Extract every page in a crawl, tolerating per-page failures.
    pub fn extract_crawl(&self, domain: &str, pages: &[CrawlPage]) -> ExtractionResult {
        let mut extracted = Vec::new();
        let mut errors = 0usize;
        let mut total_words = 0usize;
        let mut schema_types: BTreeSet<String> = BTreeSet::new();

        for page in pages {
            match self.extract_page(page) {
                Some(page) => {
                    total_words += page.word_count;
                    schema_types.extend(page.metadata.schema_types.iter().cloned());
                    extracted.push(page);
                }
                None => errors += 1,
            }
        }

        let avg_word_count = if extracted.is_empty() {
            0.0
        } else {
            total_words as f64 / extracted.len() as f64
        };

        ExtractionResult {
            domain: domain.to_string(),
            total_pages: extracted.len(),
            total_words,
            extraction_errors: errors,
            avg_word_count,
            schema_types_found: schema_types.into_iter().collect(),
            pages: extracted,
        }
    }
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        text.to_string()
    } else {
        text.chars().take(max_len).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_types::crawl::Surface;

    fn page(html: &str) -> CrawlPage {
        CrawlPage {
            url: "https://example.com/".to_string(),
            final_url: "https://example.com/".to_string(),
            title: None,
            html: html.to_string(),
            content_type: Some("text/html".to_string()),
            status_code: 200,
            depth: 0,
            fetch_time_ms: 10,
            fetched_at: Utc::now(),
            links_found: 0,
            surface: Surface::Marketing,
        }
    }

    #[test]
    fn skips_pages_below_min_content_length() {
        let extractor = ContentExtractor::default();
        let result = extractor.extract_page(&page("<html><body><p>hi</p></body></html>"));
        assert!(result.is_none());
    }

    #[test]
    fn extracts_a_well_formed_page() {
        let extractor = ContentExtractor::default();
        let html = format!(
            "<html><body><main><p>{}</p></main></body></html>",
            "word ".repeat(30)
        );
        let extracted = extractor.extract_page(&page(&html)).unwrap();
        assert!(extracted.word_count >= 30);
        assert!(extracted.compression_ratio > 0.0);
    }

    #[test]
    fn extract_crawl_aggregates_across_pages() {
        let extractor = ContentExtractor::default();
        let good_html = format!(
            "<html><body><main><p>{}</p></main></body></html>",
            "word ".repeat(30)
        );
        let pages = vec![page(&good_html), page("<html><body><p>hi</p></body></html>")];
        let result = extractor.extract_crawl("example.com", &pages);
        assert_eq!(result.total_pages, 1);
        assert_eq!(result.extraction_errors, 1);
    }
}
