//! `<head>`, Open Graph/Twitter card, schema.org and heading metadata
//! extraction.

use findable_types::extraction::{Headings, OpenGraphMetadata, PageMetadata, TwitterCardMetadata};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

static SCHEMA_TYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"schema\.org/(\w+)").unwrap());

fn meta_by_name<'a>(document: &'a Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{name}" i]"#)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn meta_by_property(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{property}"]"#)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_headings(document: &Html) -> Headings {
    let mut headings = Headings::default();
    for (level, bucket) in [
        (1u8, &mut headings.h1),
        (2, &mut headings.h2),
        (3, &mut headings.h3),
        (4, &mut headings.h4),
        (5, &mut headings.h5),
        (6, &mut headings.h6),
    ] {
        let Ok(selector) = Selector::parse(&format!("h{level}")) else {
            continue;
        };
        for el in document.select(&selector) {
            let text: String = el.text().collect::<Vec<_>>().join(" ");
            let text = text.trim();
            if !text.is_empty() {
                bucket.push(text.chars().take(200).collect());
            }
        }
    }
    headings
}

fn extract_schema_types(document: &Html) -> Vec<String> {
    let mut types: BTreeSet<String> = BTreeSet::new();

    if let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) {
        for el in document.select(&selector) {
            let raw: String = el.text().collect();
            let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) else {
                continue;
            };
            collect_json_ld_types(&value, &mut types);
        }
    }

    if let Ok(selector) = Selector::parse("[itemtype]") {
        for el in document.select(&selector) {
            if let Some(itemtype) = el.value().attr("itemtype") {
                if itemtype.contains("schema.org") {
                    if let Some(caps) = SCHEMA_TYPE_RE.captures(itemtype) {
                        types.insert(caps[1].to_string());
                    }
                }
            }
        }
    }

    types.into_iter().collect()
}

fn collect_json_ld_types(value: &serde_json::Value, types: &mut BTreeSet<String>) {
    match value {
        serde_json::Value::Array(items) => {
            for item in items {
                collect_json_ld_types(item, types);
            }
        }
        serde_json::Value::Object(map) => {
            if let Some(t) = map.get("@type") {
                push_type_value(t, types);
            }
            if let Some(graph) = map.get("@graph") {
                collect_json_ld_types(graph, types);
            }
        }
        _ => {}
    }
}

fn push_type_value(value: &serde_json::Value, types: &mut BTreeSet<String>) {
    match value {
        serde_json::Value::String(s) => {
            types.insert(s.clone());
        }
        serde_json::Value::Array(items) => {
            for item in items {
                if let serde_json::Value::String(s) = item {
                    types.insert(s.clone());
                }
            }
        }
        _ => {}
    }
}

fn is_internal_link(href: &str, base_domain: &str) -> bool {
    if href.is_empty() {
        return false;
    }
    if href.starts_with('/') || href.starts_with('#') || href.starts_with('?') {
        return true;
    }
    !base_domain.is_empty() && href.to_ascii_lowercase().contains(&base_domain.to_ascii_lowercase())
}

/// Extract `PageMetadata` from a full HTML document. `url`, if given,
/// resolves a relative favicon href and classifies link internal/external
/// counts against the page's own domain.
pub fn extract_metadata(html: &str, url: Option<&str>) -> PageMetadata {
    let document = Html::parse_document(html);
    let base_domain = url.and_then(findable_url::extract_domain).unwrap_or_default();

    let mut metadata = PageMetadata::default();

    if let Ok(selector) = Selector::parse("title") {
        metadata.title = document.select(&selector).next().map(|el| {
            let text: String = el.text().collect::<Vec<_>>().join(" ");
            text.trim().chars().take(500).collect()
        });
    }

    metadata.description = meta_by_name(&document, "description");
    if let Some(keywords) = meta_by_name(&document, "keywords") {
        metadata.keywords = keywords
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .take(20)
            .collect();
    }

    metadata.author = meta_by_name(&document, "author");
    metadata.published_date = meta_by_name(&document, "article:published_time")
        .or_else(|| meta_by_property(&document, "article:published_time"))
        .or_else(|| meta_by_name(&document, "date"))
        .or_else(|| meta_by_name(&document, "pubdate"));
    metadata.modified_date = meta_by_name(&document, "article:modified_time")
        .or_else(|| meta_by_property(&document, "article:modified_time"))
        .or_else(|| meta_by_name(&document, "last-modified"));

    if let Ok(selector) = Selector::parse(r#"link[rel="canonical"]"#) {
        metadata.canonical_url = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(str::to_string);
    }

    if let Ok(selector) = Selector::parse("html") {
        metadata.language = document.select(&selector).next().and_then(|el| {
            el.value()
                .attr("lang")
                .or_else(|| el.value().attr("xml:lang"))
                .map(str::to_string)
        });
    }

    metadata.og = OpenGraphMetadata {
        title: meta_by_property(&document, "og:title"),
        description: meta_by_property(&document, "og:description"),
        image: meta_by_property(&document, "og:image"),
        og_type: meta_by_property(&document, "og:type"),
        site_name: meta_by_property(&document, "og:site_name"),
        url: meta_by_property(&document, "og:url"),
    };
    metadata.twitter = TwitterCardMetadata {
        card: meta_by_name(&document, "twitter:card"),
        title: meta_by_name(&document, "twitter:title"),
        description: meta_by_name(&document, "twitter:description"),
        image: meta_by_name(&document, "twitter:image"),
    };

    if let Ok(selector) = Selector::parse(r#"link[rel~="icon"]"#) {
        if let Some(href) = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("href"))
        {
            metadata.favicon = match url {
                Some(base) if !href.starts_with("http") => {
                    url::Url::parse(base).ok().and_then(|b| b.join(href).ok()).map(|u| u.to_string())
                }
                _ => Some(href.to_string()),
            }
            .or_else(|| Some(href.to_string()));
        }
    }

    metadata.headings = extract_headings(&document);

    if let Ok(selector) = Selector::parse("a[href]") {
        for el in document.select(&selector) {
            if let Some(href) = el.value().attr("href") {
                if is_internal_link(href, &base_domain) {
                    metadata.internal_link_count += 1;
                } else {
                    metadata.external_link_count += 1;
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("img") {
        metadata.image_count = document.select(&selector).count();
    }

    if let Ok(selector) = Selector::parse("body") {
        let text: String = document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();
        metadata.word_count = text.split_whitespace().count();
    }

    metadata.schema_types = extract_schema_types(&document);

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <html lang="en">
        <head>
            <title>Example Page</title>
            <meta name="description" content="An example page">
            <meta name="keywords" content="rust, findability, seo">
            <meta property="og:title" content="OG Title">
            <link rel="canonical" href="https://example.com/page">
            <script type="application/ld+json">{"@type": "Article"}</script>
        </head>
        <body>
            <h1>Main heading</h1>
            <a href="/about">About</a>
            <a href="https://other.com">Other</a>
            <img src="logo.png">
        </body>
        </html>
    "#;

    #[test]
    fn extracts_basic_fields() {
        let metadata = extract_metadata(SAMPLE, Some("https://example.com/page"));
        assert_eq!(metadata.title.as_deref(), Some("Example Page"));
        assert_eq!(metadata.description.as_deref(), Some("An example page"));
        assert_eq!(metadata.keywords, vec!["rust", "findability", "seo"]);
        assert_eq!(metadata.og.title.as_deref(), Some("OG Title"));
        assert_eq!(metadata.canonical_url.as_deref(), Some("https://example.com/page"));
        assert_eq!(metadata.language.as_deref(), Some("en"));
        assert_eq!(metadata.schema_types, vec!["Article".to_string()]);
        assert_eq!(metadata.headings.h1, vec!["Main heading".to_string()]);
        assert_eq!(metadata.internal_link_count, 1);
        assert_eq!(metadata.external_link_count, 1);
        assert_eq!(metadata.image_count, 1);
    }

    #[test]
    fn json_ld_graph_types_are_collected() {
        let html = r#"<script type="application/ld+json">
            {"@graph": [{"@type": "Organization"}, {"@type": ["WebPage", "FAQPage"]}]}
        </script>"#;
        let document = Html::parse_document(html);
        let types = extract_schema_types(&document);
        assert_eq!(types, vec!["FAQPage", "Organization", "WebPage"]);
    }
}
