//! # Findable Analyzers
//!
//! Page-level signal analyzers. Each one takes raw HTML (plus whatever
//! small amount of side-channel data it needs — a URL, a word count, a
//! fetched `robots.txt`, a TTFB duration) and returns a scored, issue-
//! annotated result. None of them fail: a page that lacks the signal an
//! analyzer looks for simply scores low with an explanatory issue, since a
//! missing signal is itself the finding.

pub mod authority;
pub mod heading;
pub mod js_detection;
pub mod links;
pub mod llms_txt;
pub mod paragraph;
pub mod robots_ai;
pub mod schema;
pub mod structure;
pub mod topic_clusters;
pub mod ttfb;

pub use authority::{analyze_authority, AuthorityAnalysis};
pub use heading::{analyze_headings, HeadingAnalysis, HeadingIssue, HeadingIssueType};
pub use js_detection::{detect_js_dependency, JsDetectionResult};
pub use links::{analyze_links, LinkAnalysis, LinkInfo};
pub use llms_txt::{check_llms_txt, generate_llms_txt_template, LlmsTxtLink, LlmsTxtResult};
pub use paragraph::{analyze_paragraphs, ParagraphAnalysis, ParagraphInfo};
pub use robots_ai::{analyze_robots_ai, RobotsAiAnalysis};
pub use schema::{analyze_schema, SchemaAnalysis, SchemaBlockIssue};
pub use structure::{analyze_structure, StructureAnalysis, SubScore};
pub use topic_clusters::{analyze_topic_clusters, PageInput, PageType, TopicCluster, TopicClusterAnalysis};
pub use ttfb::{analyze_site_ttfb, analyze_ttfb, SiteTtfbAnalysis, TtfbAnalysis};

/// Every single-page analyzer result bundled together, the unit C7's pillar
/// scorers consume. `robots_ai` and `llms_txt` are site-level (computed
/// once per site, not per page) so they're supplied separately rather than
/// recomputed here.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PageAnalysis {
    pub url: String,
    pub heading: HeadingAnalysis,
    pub links: LinkAnalysis,
    pub structure: StructureAnalysis,
    pub schema: SchemaAnalysis,
    pub authority: AuthorityAnalysis,
    pub paragraph: ParagraphAnalysis,
    pub js_detection: JsDetectionResult,
    pub ttfb: TtfbAnalysis,
}

/// Runs every per-page analyzer over one page's HTML and returns the
/// combined bundle. `schema_types_hint` comes from `findable_extraction`'s
/// metadata pass, which already walks JSON-LD for `@type` presence.
pub fn analyze_page(
    url: &str,
    html: &str,
    schema_types_hint: &[String],
    published_date: Option<&str>,
    modified_date: Option<&str>,
    ttfb: std::time::Duration,
) -> PageAnalysis {
    let heading = analyze_headings(html);
    let paragraph = analyze_paragraphs(html);
    let word_count = body_word_count(html);
    let links = analyze_links(html, url, word_count);
    let structure = analyze_structure(html, url, &heading);
    let schema = analyze_schema(html, schema_types_hint);
    let authority = analyze_authority(html, published_date, modified_date);
    let js_detection = detect_js_dependency(html);
    let ttfb = analyze_ttfb(ttfb);

    PageAnalysis {
        url: url.to_string(),
        heading,
        links,
        structure,
        schema,
        authority,
        paragraph,
        js_detection,
        ttfb,
    }
}

fn body_word_count(html: &str) -> usize {
    use scraper::{Html, Selector};
    let doc = Html::parse_document(html);
    let selector = Selector::parse("body").unwrap();
    doc.select(&selector)
        .next()
        .map(|b| b.text().collect::<Vec<_>>().join(" ").split_whitespace().count())
        .unwrap_or(0)
}
