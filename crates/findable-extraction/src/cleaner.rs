//! HTML cleaning and main-content isolation.
//!
//! Strips non-content elements (`script`, `style`, `nav`, `header`,
//! `footer`, `aside`, `form`, `noscript`) and picks the main content area
//! using the first of `<main>`, `<article>`, `#content`, `[role="main"]`,
//! falling back to `<body>` with boilerplate tags excluded.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Tags dropped everywhere in the document before any text is collected.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "path", "iframe",
];

/// Tags additionally dropped only when falling back to `<body>` (no
/// dedicated main-content container was found).
const CHROME_TAGS: &[&str] = &["nav", "header", "footer", "aside", "form"];

static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static CONTENT_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#content").unwrap());
static ROLE_MAIN_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"[role="main"]"#).unwrap());
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

/// Result of cleaning one HTML document.
pub struct CleanedContent {
    /// Text of the chosen main-content subtree, boilerplate stripped.
    pub main_content: String,
    /// Text of the whole document, boilerplate stripped.
    pub full_text: String,
}

/// Clean `html` and isolate its main content.
pub fn clean_html(html: &str) -> CleanedContent {
    let document = Html::parse_document(html);

    let main_content = find_main_element(&document)
        .map(|el| {
            // A dedicated <main>/<article>/#content container is trusted
            // as-is; only a bare <body> fallback needs chrome stripped.
            let excluded = if el.value().name() == "body" {
                CHROME_TAGS
            } else {
                &[][..]
            };
            element_text(el, excluded)
        })
        .unwrap_or_default();

    let full_text = document
        .select(&BODY_SELECTOR)
        .next()
        .map(|el| element_text(el, &[]))
        .unwrap_or_else(|| element_text(document.root_element(), &[]));

    CleanedContent {
        main_content,
        full_text,
    }
}

fn find_main_element(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&MAIN_SELECTOR)
        .next()
        .or_else(|| document.select(&ARTICLE_SELECTOR).next())
        .or_else(|| document.select(&CONTENT_ID_SELECTOR).next())
        .or_else(|| document.select(&ROLE_MAIN_SELECTOR).next())
        .or_else(|| document.select(&BODY_SELECTOR).next())
}

/// Collect text under `root`, skipping subtrees rooted at a boilerplate tag
/// or (when `extra_excluded` names them) chrome tags.
fn element_text(root: ElementRef, extra_excluded: &[&str]) -> String {
    let mut out = String::new();
    collect_text(root, extra_excluded, &mut out);
    let words: Vec<&str> = out.split_whitespace().collect();
    words.join(" ")
}

fn collect_text(node: ElementRef, excluded: &[&str], out: &mut String) {
    for child in node.children() {
        if let Some(el) = ElementRef::wrap(child) {
            let tag = el.value().name();
            if BOILERPLATE_TAGS.contains(&tag) || excluded.contains(&tag) {
                continue;
            }
            collect_text(el, excluded, out);
        } else if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_main_tag_over_body() {
        let html = r#"<html><body><nav>Menu</nav><main><p>Hello world</p></main><footer>Copyright</footer></body></html>"#;
        let cleaned = clean_html(html);
        assert_eq!(cleaned.main_content, "Hello world");
        assert!(cleaned.full_text.contains("Menu"));
    }

    #[test]
    fn falls_back_to_body_minus_chrome() {
        let html = r#"<html><body><nav>Menu</nav><p>Body copy here</p><footer>Copyright</footer></body></html>"#;
        let cleaned = clean_html(html);
        assert_eq!(cleaned.main_content, "Body copy here");
    }

    #[test]
    fn strips_script_and_style_everywhere() {
        let html = r#"<html><body><main><style>.a{color:red}</style><script>evil()</script><p>Visible text</p></main></body></html>"#;
        let cleaned = clean_html(html);
        assert_eq!(cleaned.main_content, "Visible text");
    }

    #[test]
    fn article_takes_priority_over_content_id() {
        let html = r#"<html><body><div id="content">wrong</div><article><p>Right content</p></article></body></html>"#;
        let cleaned = clean_html(html);
        assert_eq!(cleaned.main_content, "Right content");
    }
}
