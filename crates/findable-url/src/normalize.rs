//! URL canonicalization: normalize raw URLs into a stable, comparable form
//! for crawling, deduplication and storage.

use once_cell::sync::Lazy;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;
use std::collections::BTreeMap;
use url::Url;

/// File extensions treated as non-HTML and skipped outright.
pub const SKIP_EXTENSIONS: &[&str] = &[
    // Images
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".ico", ".webp", ".bmp", ".tiff",
    // Documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
    // Media
    ".mp3", ".mp4", ".avi", ".mov", ".wmv", ".flv", ".webm", ".wav",
    // Archives
    ".zip", ".rar", ".7z", ".tar", ".gz",
    // Code/Data
    ".json", ".xml", ".csv", ".txt", ".log",
    // Other
    ".exe", ".dmg", ".apk", ".ipa",
];

/// Query parameters stripped as tracking/session noise.
pub const STRIP_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "msclkid",
    "dclid",
    "ref",
    "source",
    "mc_cid",
    "mc_eid",
    "_ga",
    "_gl",
    "_hsenc",
    "_hsmi",
    "sessionid",
    "sid",
    "session",
];

static SKIP_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)/feed/?$").unwrap(),
        Regex::new(r"(?i)/rss/?$").unwrap(),
        Regex::new(r"(?i)/atom/?$").unwrap(),
        Regex::new(r"(?i)\.(xml|json)$").unwrap(),
        Regex::new(r"(?i)/wp-admin/").unwrap(),
        Regex::new(r"(?i)/wp-includes/").unwrap(),
        Regex::new(r"(?i)/wp-content/uploads/").unwrap(),
        Regex::new(r"(?i)/cdn-cgi/").unwrap(),
    ]
});

/// Normalize a URL for consistent comparison, crawling and storage.
///
/// Returns `None` for anything that should be skipped: empty input, a
/// non-http(s) scheme (`mailto:`, `tel:`, `javascript:`, bare `#fragment`),
/// a skipped extension or path pattern. Relative URLs resolve against
/// `base`; protocol-relative URLs are forced to `https`. Tracking query
/// params are stripped and the remainder is sorted for stable output.
pub fn normalize(raw: &str, base: Option<&str>) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let mut working = raw.to_string();
    if working.starts_with("//") {
        working = format!("https:{working}");
    } else if !(working.starts_with("http://") || working.starts_with("https://")) {
        let base = base?;
        let base_url = Url::parse(base).ok()?;
        working = base_url.join(&working).ok()?.to_string();
    }

    let parsed = Url::parse(&working).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    let host_raw = parsed.host_str()?.to_ascii_lowercase();
    let host = host_raw.strip_prefix("www.").unwrap_or(&host_raw);

    let mut path = parsed.path().to_string();
    if path.is_empty() {
        path = "/".to_string();
    }

    let path_lower = path.to_ascii_lowercase();
    if SKIP_EXTENSIONS.iter().any(|ext| path_lower.ends_with(ext)) {
        return None;
    }
    if SKIP_PATTERNS.iter().any(|re| re.is_match(&working)) {
        return None;
    }

    if path != "/" && path.ends_with('/') {
        path = path.trim_end_matches('/').to_string();
        if path.is_empty() {
            path = "/".to_string();
        }
    }

    let mut filtered: BTreeMap<String, String> = BTreeMap::new();
    for (k, v) in parsed.query_pairs() {
        if STRIP_PARAMS.contains(&k.to_ascii_lowercase().as_str()) {
            continue;
        }
        filtered.insert(k.into_owned(), v.into_owned());
    }

    let mut result = format!("https://{host}{path}");
    if !filtered.is_empty() {
        let query = filtered
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, NON_ALPHANUMERIC),
                    utf8_percent_encode(v, NON_ALPHANUMERIC)
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        result.push('?');
        result.push_str(&query);
    }

    Some(result)
}

/// Extract the lowercased, `www.`-stripped host from a URL.
pub fn extract_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

pub fn is_same_domain(a: &str, b: &str) -> bool {
    match (extract_domain(a), extract_domain(b)) {
        (Some(da), Some(db)) => da == db,
        _ => false,
    }
}

/// A URL is internal to domain `D` iff its host equals `D` or ends with `.D`.
pub fn is_internal_url(url: &str, base_domain: &str) -> bool {
    let Some(url_domain) = extract_domain(url) else {
        return false;
    };
    let base = base_domain
        .to_ascii_lowercase()
        .strip_prefix("www.")
        .map(str::to_string)
        .unwrap_or_else(|| base_domain.to_ascii_lowercase());

    url_domain == base || url_domain.ends_with(&format!(".{base}"))
}

/// Depth of a URL, defined as the number of non-empty path segments.
pub fn get_url_depth(url: &str) -> u32 {
    let Ok(parsed) = Url::parse(url) else {
        return 0;
    };
    let path = parsed.path().trim_matches('/');
    if path.is_empty() {
        0
    } else {
        path.split('/').count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotent() {
        let once = normalize("https://WWW.Example.com/Foo/?b=2&a=1&utm_source=x", None).unwrap();
        let twice = normalize(&once, None).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn strips_www_and_forces_https() {
        assert_eq!(
            normalize("http://www.example.com", None).unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn strips_tracking_params_and_sorts_remainder() {
        assert_eq!(
            normalize("https://example.com/?utm_source=x&b=2&a=1", None).unwrap(),
            "https://example.com/?a=1&b=2"
        );
    }

    #[test]
    fn drops_trailing_slash_on_non_root() {
        assert_eq!(
            normalize("https://example.com/about/", None).unwrap(),
            "https://example.com/about"
        );
        assert_eq!(
            normalize("https://example.com/", None).unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert!(normalize("mailto:hi@example.com", None).is_none());
        assert!(normalize("javascript:void(0)", None).is_none());
        assert!(normalize("tel:+1234567", None).is_none());
        assert!(normalize("#fragment-only", None).is_none());
    }

    #[test]
    fn rejects_skip_extensions_and_patterns() {
        assert!(normalize("https://example.com/image.png", None).is_none());
        assert!(normalize("https://example.com/feed/", None).is_none());
        assert!(normalize("https://example.com/wp-admin/edit", None).is_none());
    }

    #[test]
    fn resolves_relative_against_base() {
        assert_eq!(
            normalize("/pricing", Some("https://example.com/about")).unwrap(),
            "https://example.com/pricing"
        );
    }

    #[test]
    fn protocol_relative_forced_https() {
        assert_eq!(
            normalize("//example.com/docs", None).unwrap(),
            "https://example.com/docs"
        );
    }

    #[test]
    fn internal_url_matches_subdomains() {
        assert!(is_internal_url("https://docs.example.com/x", "example.com"));
        assert!(is_internal_url("https://example.com/x", "example.com"));
        assert!(!is_internal_url("https://other.com/x", "example.com"));
    }
}
