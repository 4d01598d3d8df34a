//! Post-crawl extraction data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Open Graph metadata fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenGraphMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub og_type: Option<String>,
    pub site_name: Option<String>,
    pub url: Option<String>,
}

/// Twitter card metadata fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwitterCardMetadata {
    pub card: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

/// Heading text grouped by level (h1..h6).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Headings {
    pub h1: Vec<String>,
    pub h2: Vec<String>,
    pub h3: Vec<String>,
    pub h4: Vec<String>,
    pub h5: Vec<String>,
    pub h6: Vec<String>,
}

impl Headings {
    pub fn all(&self) -> impl Iterator<Item = (u8, &String)> {
        self.h1
            .iter()
            .map(|t| (1u8, t))
            .chain(self.h2.iter().map(|t| (2u8, t)))
            .chain(self.h3.iter().map(|t| (3u8, t)))
            .chain(self.h4.iter().map(|t| (4u8, t)))
            .chain(self.h5.iter().map(|t| (5u8, t)))
            .chain(self.h6.iter().map(|t| (6u8, t)))
    }
}

/// Descriptive metadata pulled from the document `<head>` and structured
/// data blocks. Purely descriptive; never drives control flow on its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
    pub author: Option<String>,
    pub published_date: Option<String>,
    pub modified_date: Option<String>,
    pub canonical_url: Option<String>,
    pub language: Option<String>,
    pub og: OpenGraphMetadata,
    pub twitter: TwitterCardMetadata,
    pub favicon: Option<String>,
    pub headings: Headings,
    pub internal_link_count: usize,
    pub external_link_count: usize,
    pub image_count: usize,
    pub word_count: usize,
    /// `@type` values found in JSON-LD (including `@graph` walks) plus
    /// microdata `itemtype`s matching `schema.org/<T>`.
    pub schema_types: Vec<String>,
}

/// A cleaned, main-content-isolated page ready for analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub url: String,
    pub title: Option<String>,
    pub main_content: String,
    pub full_text: String,
    pub metadata: PageMetadata,
    pub word_count: usize,
    pub depth: u32,
    pub fetched_at: DateTime<Utc>,
    pub html_size: usize,
    pub content_size: usize,
    pub compression_ratio: f64,
}

impl ExtractedPage {
    pub fn new(
        url: String,
        title: Option<String>,
        main_content: String,
        full_text: String,
        metadata: PageMetadata,
        depth: u32,
        fetched_at: DateTime<Utc>,
        html_size: usize,
    ) -> Self {
        let content_size = main_content.len();
        let word_count = main_content.split_whitespace().count();
        let compression_ratio = if html_size > 0 {
            content_size as f64 / html_size as f64
        } else {
            0.0
        };
        Self {
            url,
            title,
            main_content,
            full_text,
            metadata,
            word_count,
            depth,
            fetched_at,
            html_size,
            content_size,
            compression_ratio,
        }
    }
}
