//! # Findable Extraction
//!
//! C5 of the audit pipeline: turns a crawled page's raw HTML into clean,
//! analyzable content — a boilerplate-stripped main-content isolate, the
//! full document text, and structured `<head>`/Open Graph/Twitter/
//! schema.org metadata.

pub mod cleaner;
pub mod extractor;
pub mod metadata;

pub use cleaner::{clean_html, CleanedContent};
pub use extractor::{ContentExtractor, ExtractionResult, ExtractorConfig};
pub use metadata::extract_metadata;
