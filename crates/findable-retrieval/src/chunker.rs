//! Semantic chunker (C8): splits a page's main content into paragraph-
//! bounded chunks, each tagged with the heading chain that precedes it.
//!
//! Unlike `findable_extraction::clean_html` (which flattens a page to a
//! single whitespace-joined string for metadata/word-count purposes), the
//! chunker needs document order and paragraph/heading boundaries, so it
//! walks the DOM directly rather than consuming `ExtractedPage`. The
//! main-content container selection mirrors `findable_extraction::cleaner`'s
//! `<main>` / `<article>` / `#content` / `[role="main"]` / `<body>` chain so
//! the two modules agree on what counts as "the content".

use findable_types::chunk::{Chunk, ChunkType};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Soft target and hard max chunk size, in characters. A single block
/// (one `<p>`, one list, one table) is never split even if it exceeds the
/// hard max alone — only accumulation across blocks is bounded by it.
#[derive(Debug, Clone, Copy)]
pub struct ChunkerConfig {
    pub soft_target_chars: usize,
    pub hard_max_chars: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            soft_target_chars: 600,
            hard_max_chars: 1200,
        }
    }
}

static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static CONTENT_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#content").unwrap());
static ROLE_MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"[role="main"]"#).unwrap());
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

fn find_main_element(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&MAIN_SELECTOR)
        .next()
        .or_else(|| document.select(&ARTICLE_SELECTOR).next())
        .or_else(|| document.select(&CONTENT_ID_SELECTOR).next())
        .or_else(|| document.select(&ROLE_MAIN_SELECTOR).next())
        .or_else(|| document.select(&BODY_SELECTOR).next())
}

struct Block {
    kind: ChunkType,
    heading_context: Option<String>,
    text: String,
}

/// Walk `root` in document order, collecting one `Block` per heading,
/// paragraph, list, table, and preformatted/code element. `stack` tracks
/// the nearest-enclosing heading chain, e.g. `"Getting Started > Install"`.
fn collect_blocks(root: ElementRef, stack: &mut Vec<(u8, String)>, out: &mut Vec<Block>) {
    for child in root.children() {
        let Some(el) = ElementRef::wrap(child) else { continue };
        let tag = el.value().name();
        match tag {
            "script" | "style" | "noscript" | "template" | "nav" | "header" | "footer" | "aside" | "form" => continue,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level: u8 = tag[1..].parse().unwrap_or(1);
                let text = normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    stack.retain(|(l, _)| *l < level);
                    stack.push((level, text.clone()));
                    out.push(Block {
                        kind: ChunkType::Heading,
                        heading_context: heading_chain(stack),
                        text,
                    });
                }
            }
            "p" => {
                let text = normalize_whitespace(&el.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    out.push(Block {
                        kind: ChunkType::Text,
                        heading_context: heading_chain(stack),
                        text,
                    });
                }
            }
            "ul" | "ol" => {
                let text = normalize_whitespace(&el.text().collect::<Vec<_>>().join(" | "));
                if !text.is_empty() {
                    out.push(Block {
                        kind: ChunkType::List,
                        heading_context: heading_chain(stack),
                        text,
                    });
                }
            }
            "table" => {
                let text = normalize_whitespace(&el.text().collect::<Vec<_>>().join(" | "));
                if !text.is_empty() {
                    out.push(Block {
                        kind: ChunkType::Table,
                        heading_context: heading_chain(stack),
                        text,
                    });
                }
            }
            "pre" | "code" => {
                let text = el.text().collect::<Vec<_>>().join("");
                if !text.trim().is_empty() {
                    out.push(Block {
                        kind: ChunkType::Code,
                        heading_context: heading_chain(stack),
                        text: text.trim().to_string(),
                    });
                }
            }
            _ => collect_blocks(el, stack, out),
        }
    }
}

fn heading_chain(stack: &[(u8, String)]) -> Option<String> {
    if stack.is_empty() {
        None
    } else {
        Some(stack.iter().map(|(_, t)| t.as_str()).collect::<Vec<_>>().join(" > "))
    }
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Chunk a page's HTML into document-ordered, heading-tagged `Chunk`s.
///
/// Invariant (tested below): `position_ratio` strictly increases across the
/// returned chunks, and concatenating chunk content reproduces the source
/// blocks without reordering.
pub fn chunk_page(page_id: &str, html: &str, config: ChunkerConfig) -> Vec<Chunk> {
    let document = Html::parse_document(html);
    let Some(root) = find_main_element(&document) else {
        return Vec::new();
    };

    let mut stack = Vec::new();
    let mut blocks = Vec::new();
    collect_blocks(root, &mut stack, &mut blocks);
    // Headings are markers for context, not standalone retrievable chunks.
    blocks.retain(|b| !matches!(b.kind, ChunkType::Heading));

    if blocks.is_empty() {
        return Vec::new();
    }

    let total_chars: usize = blocks.iter().map(|b| b.text.len()).sum::<usize>().max(1);

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_kind = ChunkType::Text;
    let mut current_heading: Option<String> = None;
    let mut char_offset = 0usize;
    let mut last_ratio = -1.0f64;

    let mut flush = |current: &mut String, kind: ChunkType, heading: &Option<String>, char_offset: usize, chunks: &mut Vec<Chunk>, last_ratio: &mut f64| {
        if current.is_empty() {
            return;
        }
        let mut ratio = (char_offset as f64 / total_chars as f64).clamp(0.0, 1.0);
        if ratio <= *last_ratio {
            ratio = (*last_ratio + 1e-6).min(1.0);
        }
        *last_ratio = ratio;
        chunks.push(Chunk {
            chunk_id: format!("{page_id}-c{}", chunks.len()),
            page_id: page_id.to_string(),
            content: std::mem::take(current),
            heading_context: heading.clone(),
            chunk_type: kind,
            chunk_index: chunks.len(),
            position_ratio: ratio,
        });
    };

    for block in &blocks {
        let would_be = current.len() + block.text.len() + 1;
        let heading_changed = current_heading.is_some() && current_heading != block.heading_context && !current.is_empty();
        if !current.is_empty() && (would_be > config.hard_max_chars || heading_changed) {
            flush(&mut current, current_kind, &current_heading, char_offset, &mut chunks, &mut last_ratio);
        }
        if current.is_empty() {
            current_heading = block.heading_context.clone();
            current_kind = block.kind;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&block.text);
        char_offset += block.text.len();
        if current.len() >= config.soft_target_chars {
            flush(&mut current, current_kind, &current_heading, char_offset, &mut chunks, &mut last_ratio);
        }
    }
    flush(&mut current, current_kind, &current_heading, char_offset, &mut chunks, &mut last_ratio);

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_in_document_order_with_increasing_ratio() {
        let html = r#"<html><body><main>
            <h2>Getting Started</h2>
            <p>First paragraph about setup and installation with enough words to matter.</p>
            <h2>Advanced Usage</h2>
            <p>Second paragraph describing advanced configuration options in depth.</p>
        </main></body></html>"#;
        let chunks = chunk_page("page-1", html, ChunkerConfig::default());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].heading_context.as_deref(), Some("Getting Started"));
        assert_eq!(chunks[1].heading_context.as_deref(), Some("Advanced Usage"));
        assert!(chunks[0].position_ratio < chunks[1].position_ratio);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.chunk_index, i);
        }
    }

    #[test]
    fn empty_main_content_yields_no_chunks() {
        let html = r#"<html><body><main></main></body></html>"#;
        assert!(chunk_page("page-1", html, ChunkerConfig::default()).is_empty());
    }

    #[test]
    fn nested_heading_chain_tracks_parent_levels() {
        let html = r#"<html><body><main>
            <h1>Docs</h1>
            <h2>Install</h2>
            <p>Run the installer and follow the on-screen prompts to completion.</p>
        </main></body></html>"#;
        let chunks = chunk_page("page-1", html, ChunkerConfig::default());
        assert_eq!(chunks[0].heading_context.as_deref(), Some("Docs > Install"));
    }
}
