//! sitemap.xml and sitemap-index parsing. Gzip transport is handled
//! transparently via `flate2`; XML via `quick-xml`'s pull-parser rather than
//! building a DOM.

use flate2::read::GzDecoder;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::Read;

/// One `<url>` entry from a urlset sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<String>,
    pub priority: Option<f64>,
    pub changefreq: Option<String>,
}

/// The result of fetching and parsing one sitemap document.
#[derive(Debug, Clone, Default)]
pub struct SitemapFetchResult {
    /// Page URLs, present only for a urlset document.
    pub entries: Vec<SitemapEntry>,
    /// Nested sitemap URLs, present only for a sitemapindex document.
    pub nested_sitemaps: Vec<String>,
    pub is_index: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SitemapParser {
    pub max_sitemaps: usize,
    pub max_urls: usize,
}

impl Default for SitemapParser {
    fn default() -> Self {
        Self {
            max_sitemaps: 50,
            max_urls: 50_000,
        }
    }
}

impl SitemapParser {
    pub fn new(max_sitemaps: usize, max_urls: usize) -> Self {
        Self {
            max_sitemaps,
            max_urls,
        }
    }

    /// Transparently gunzip `body` if it looks gzip-compressed (magic bytes
    /// `1f 8b`, or the source URL ends in `.gz`), otherwise return it as-is.
    pub fn maybe_decompress(body: &[u8], source_url: &str) -> Vec<u8> {
        let looks_gzipped = body.len() >= 2 && body[0] == 0x1f && body[1] == 0x8b;
        if looks_gzipped || source_url.ends_with(".gz") {
            let mut decoder = GzDecoder::new(body);
            let mut out = Vec::new();
            if decoder.read_to_end(&mut out).is_ok() {
                return out;
            }
        }
        body.to_vec()
    }

    /// Parse a sitemap or sitemap-index document, capping the number of
    /// entries/nested sitemaps collected at `max_urls`/`max_sitemaps`.
    /// Entries are returned sorted by priority descending (missing priority
    /// sorts last, ties keep document order).
    pub fn parse(&self, xml: &[u8]) -> anyhow::Result<SitemapFetchResult> {
        let text = String::from_utf8_lossy(xml);
        let mut reader = Reader::from_str(&text);
        reader.config_mut().trim_text = true;

        let mut result = SitemapFetchResult::default();
        let mut buf = Vec::new();

        let mut in_sitemap_index = false;
        let mut in_url_entry = false;
        let mut current_tag: Option<String> = None;
        let mut loc: Option<String> = None;
        let mut lastmod: Option<String> = None;
        let mut priority: Option<f64> = None;
        let mut changefreq: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = local_name(e.name().as_ref());
                    match name.as_str() {
                        "sitemapindex" => {
                            result.is_index = true;
                            in_sitemap_index = true;
                        }
                        "sitemap" | "url" => {
                            in_url_entry = true;
                            loc = None;
                            lastmod = None;
                            priority = None;
                            changefreq = None;
                        }
                        _ => {}
                    }
                    current_tag = Some(name);
                }
                Ok(Event::Text(t)) => {
                    if !in_url_entry {
                        continue;
                    }
                    let text = t.unescape().unwrap_or_default().trim().to_string();
                    if text.is_empty() {
                        continue;
                    }
                    match current_tag.as_deref() {
                        Some("loc") => loc = Some(text),
                        Some("lastmod") => lastmod = Some(text),
                        Some("priority") => priority = text.parse::<f64>().ok(),
                        Some("changefreq") => changefreq = Some(text),
                        _ => {}
                    }
                }
                Ok(Event::End(e)) => {
                    let name = local_name(e.name().as_ref());
                    if name == "sitemap" && in_sitemap_index {
                        in_url_entry = false;
                        if let Some(loc) = loc.take() {
                            if result.nested_sitemaps.len() < self.max_sitemaps {
                                result.nested_sitemaps.push(loc);
                            }
                        }
                    } else if name == "url" && !in_sitemap_index {
                        in_url_entry = false;
                        if let Some(loc) = loc.take() {
                            if result.entries.len() < self.max_urls {
                                result.entries.push(SitemapEntry {
                                    loc,
                                    lastmod: lastmod.take(),
                                    priority,
                                    changefreq: changefreq.take(),
                                });
                            }
                        }
                    }
                    current_tag = None;
                }
                Ok(Event::Eof) => break,
                Err(err) => return Err(anyhow::anyhow!("sitemap xml parse error: {err}")),
                _ => {}
            }
            buf.clear();
        }

        result.entries.sort_by(|a, b| {
            b.priority
                .unwrap_or(0.0)
                .partial_cmp(&a.priority.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(result)
    }
}

fn local_name(qname: &[u8]) -> String {
    let s = String::from_utf8_lossy(qname);
    match s.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_urlset_and_sorts_by_priority() {
        let xml = br#"<?xml version="1.0"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url><loc>https://example.com/low</loc><priority>0.2</priority></url>
          <url><loc>https://example.com/high</loc><priority>0.9</priority></url>
          <url><loc>https://example.com/none</loc></url>
        </urlset>"#;
        let parser = SitemapParser::default();
        let result = parser.parse(xml).unwrap();
        assert!(!result.is_index);
        assert_eq!(result.entries.len(), 3);
        assert_eq!(result.entries[0].loc, "https://example.com/high");
        assert_eq!(result.entries[1].loc, "https://example.com/low");
        assert_eq!(result.entries[2].loc, "https://example.com/none");
    }

    #[test]
    fn parses_sitemap_index() {
        let xml = br#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <sitemap><loc>https://example.com/sitemap-1.xml</loc></sitemap>
          <sitemap><loc>https://example.com/sitemap-2.xml</loc></sitemap>
        </sitemapindex>"#;
        let parser = SitemapParser::default();
        let result = parser.parse(xml).unwrap();
        assert!(result.is_index);
        assert_eq!(result.nested_sitemaps.len(), 2);
        assert!(result.entries.is_empty());
    }

    #[test]
    fn caps_are_respected() {
        let xml = br#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url><loc>https://example.com/a</loc></url>
          <url><loc>https://example.com/b</loc></url>
          <url><loc>https://example.com/c</loc></url>
        </urlset>"#;
        let parser = SitemapParser::new(50, 2);
        let result = parser.parse(xml).unwrap();
        assert_eq!(result.entries.len(), 2);
    }

    #[test]
    fn decompresses_gzip_magic_bytes() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let raw = b"<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"><url><loc>https://example.com/a</loc></url></urlset>";
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(raw).unwrap();
        let gzipped = encoder.finish().unwrap();

        let decompressed = SitemapParser::maybe_decompress(&gzipped, "https://example.com/sitemap.xml.gz");
        assert_eq!(decompressed, raw);
    }

    #[test]
    fn passes_through_plain_xml_unchanged() {
        let raw = b"<urlset></urlset>";
        let out = SitemapParser::maybe_decompress(raw, "https://example.com/sitemap.xml");
        assert_eq!(out, raw);
    }
}
