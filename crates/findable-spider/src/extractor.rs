//! Outbound-link discovery for the crawl frontier. Extraction of page
//! content/metadata for scoring purposes lives in `findable-extraction`;
//! this module only needs enough of the DOM to find `<a href>` targets and
//! the page title for `CrawlPage::title`.

use scraper::{Html, Selector};

pub struct LinkExtraction {
    pub links: Vec<String>,
    pub title: Option<String>,
}

/// Parse `html` (served from `page_url`) and return every internal link,
/// normalized and resolved against `page_url`, plus the page's `<title>`.
pub fn extract_links(html: &str, page_url: &str, base_domain: &str, follow_external: bool) -> LinkExtraction {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").expect("static selector");
    let title_selector = Selector::parse("title").expect("static selector");

    let title = document
        .select(&title_selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let mut links = Vec::new();
    for el in document.select(&link_selector) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let Some(normalized) = findable_url::normalize(href, Some(page_url)) else {
            continue;
        };
        if !follow_external && !findable_url::is_internal_url(&normalized, base_domain) {
            continue;
        }
        links.push(normalized);
    }

    LinkExtraction { links, title }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_internal_links_and_title() {
        let html = r#"
            <html><head><title>Example Home</title></head>
            <body>
                <a href="/about">About</a>
                <a href="https://other.com/x">External</a>
                <a href="mailto:hi@example.com">Mail</a>
            </body></html>
        "#;
        let result = extract_links(html, "https://example.com/", "example.com", false);
        assert_eq!(result.title.as_deref(), Some("Example Home"));
        assert_eq!(result.links, vec!["https://example.com/about".to_string()]);
    }

    #[test]
    fn follow_external_includes_other_domains() {
        let html = r#"<a href="https://other.com/x">External</a>"#;
        let result = extract_links(html, "https://example.com/", "example.com", true);
        assert_eq!(result.links, vec!["https://other.com/x".to_string()]);
    }
}
