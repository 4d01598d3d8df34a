//! JavaScript dependency detection.
//!
//! AI crawlers (GPTBot, ClaudeBot, PerplexityBot) do not execute JavaScript.
//! A page that renders its content client-side looks empty to them. This
//! module estimates how much of a page's content survives without a JS
//! runtime.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

const MIN_CONTENT_LENGTH: usize = 500;
const CRITICAL_CONTENT_LENGTH: usize = 100;

const JS_FRAMEWORK_MARKERS: &[(&str, &str)] = &[
    (r#"id="root""#, "React"),
    (r#"id="__next""#, "Next.js"),
    ("data-reactroot", "React"),
    ("__next_data__", "Next.js"),
    (r#"id="app""#, "Vue.js"),
    ("data-v-", "Vue.js"),
    ("__nuxt__", "Nuxt.js"),
    ("ng-app", "Angular"),
    ("ng-version", "Angular"),
    ("_nghost", "Angular"),
    ("svelte-", "SvelteKit"),
    ("window.__initial_state__", "SPA"),
    ("window.__preloaded_state__", "SPA"),
];

const LOADING_INDICATORS: &[&str] = &[
    "loading...",
    "please wait",
    "javascript is required",
    "enable javascript",
    "this site requires javascript",
];

static MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
static ARTICLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static CONTENT_ID_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("#content").unwrap());
static MAIN_CONTENT_ID_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#main-content").unwrap());
static CONTENT_CLASS_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(".content").unwrap());
static ROLE_MAIN_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse(r#"[role="main"]"#).unwrap());
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static NOSCRIPT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("noscript").unwrap());
static NOISE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("script, style, nav, footer, header").unwrap());
static LOADING_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)loading|spinner|skeleton").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsDetectionResult {
    pub likely_js_dependent: bool,
    pub confidence: String,
    pub score: f64,
    pub level: String,
    pub severity: String,
    pub framework_detected: Option<String>,
    pub framework_markers_found: Vec<String>,
    pub content_length: usize,
    pub main_content_length: usize,
    pub has_noscript_fallback: bool,
    pub has_loading_indicators: bool,
    pub is_empty_shell: bool,
    pub issues: Vec<String>,
}

pub fn detect_js_dependency(html: &str) -> JsDetectionResult {
    let mut result = JsDetectionResult {
        score: 100.0,
        confidence: "low".to_string(),
        ..Default::default()
    };

    if html.is_empty() {
        result.likely_js_dependent = true;
        result.confidence = "high".to_string();
        result.score = 0.0;
        result.is_empty_shell = true;
        result.severity = "blocking".to_string();
        result.level = "critical".to_string();
        result.issues.push("No HTML content received".to_string());
        return result;
    }

    let doc = Html::parse_document(html);
    result.content_length = html.len();
    result.main_content_length = main_content_length(&doc);

    let html_lower = html.to_ascii_lowercase();
    for (marker, framework) in JS_FRAMEWORK_MARKERS {
        if html_lower.contains(&marker.to_ascii_lowercase()) {
            result.framework_markers_found.push((*marker).to_string());
            if result.framework_detected.is_none() {
                result.framework_detected = Some((*framework).to_string());
            }
        }
    }

    result.has_noscript_fallback = doc
        .select(&NOSCRIPT_SELECTOR)
        .any(|el| el.text().collect::<String>().trim().len() > 100);

    result.has_loading_indicators = has_loading_state(&doc);

    calculate_js_dependency(&mut result);
    result.is_empty_shell = result.main_content_length < CRITICAL_CONTENT_LENGTH;
    result.severity = if result.is_empty_shell {
        "blocking".to_string()
    } else if result.likely_js_dependent {
        "degraded".to_string()
    } else {
        "ok".to_string()
    };
    result.level = if result.score >= 80.0 {
        "good".to_string()
    } else if result.score >= 50.0 {
        "warning".to_string()
    } else {
        "critical".to_string()
    };
    result
}

fn main_content_length(doc: &Html) -> usize {
    let candidates = [
        doc.select(&MAIN_SELECTOR).next(),
        doc.select(&ARTICLE_SELECTOR).next(),
        doc.select(&CONTENT_ID_SELECTOR).next(),
        doc.select(&MAIN_CONTENT_ID_SELECTOR).next(),
        doc.select(&CONTENT_CLASS_SELECTOR).next(),
        doc.select(&ROLE_MAIN_SELECTOR).next(),
    ];
    for candidate in candidates.into_iter().flatten() {
        let text: String = candidate.text().collect::<Vec<_>>().join(" ");
        return text.trim().len();
    }

    if let Some(body) = doc.select(&BODY_SELECTOR).next() {
        let noise_texts: Vec<String> = body
            .select(&NOISE_SELECTOR)
            .map(|el| el.text().collect::<Vec<_>>().join(" "))
            .collect();
        let noise_len: usize = noise_texts.iter().map(|t| t.len()).sum();
        let full_text: String = body.text().collect::<Vec<_>>().join(" ");
        return full_text.trim().len().saturating_sub(noise_len);
    }
    0
}

fn has_loading_state(doc: &Html) -> bool {
    let body_text: String = doc
        .select(&BODY_SELECTOR)
        .next()
        .map(|b| b.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
        .to_ascii_lowercase();
    if LOADING_INDICATORS.iter().any(|i| body_text.contains(i)) {
        return true;
    }
    let all_selector = Selector::parse("[class]").unwrap();
    let loading_class_count = doc
        .select(&all_selector)
        .filter(|el| {
            el.value()
                .attr("class")
                .map(|c| LOADING_CLASS_RE.is_match(c))
                .unwrap_or(false)
        })
        .count();
    loading_class_count > 5
}

fn calculate_js_dependency(result: &mut JsDetectionResult) {
    let mut score = 100.0;
    let mut issues = Vec::new();
    let mut confidence_factors = 0;

    if result.main_content_length < CRITICAL_CONTENT_LENGTH {
        score -= 60.0;
        confidence_factors += 3;
        if result.main_content_length == 0 {
            issues.push(
                "No main content detected - page appears to be a JavaScript shell (AI crawlers will see an empty page)"
                    .to_string(),
            );
        } else {
            issues.push(format!(
                "Almost no content visible without JavaScript ({} chars) - AI crawlers cannot access your content",
                result.main_content_length
            ));
        }
    } else if result.main_content_length < MIN_CONTENT_LENGTH {
        score -= 40.0;
        confidence_factors += 2;
        issues.push(format!(
            "Main content very short ({} chars, minimum {}) - may require JavaScript to render",
            result.main_content_length, MIN_CONTENT_LENGTH
        ));
    } else if result.main_content_length < MIN_CONTENT_LENGTH * 2 {
        score -= 20.0;
        confidence_factors += 1;
    }

    if let Some(framework) = &result.framework_detected {
        score -= 30.0;
        confidence_factors += 1;
        issues.push(format!("{framework} framework detected - ensure SSR/prerendering is enabled"));
    }

    if result.has_loading_indicators {
        score -= 15.0;
        confidence_factors += 1;
        issues.push("Loading state indicators found".to_string());
    }

    if result.has_noscript_fallback {
        score += 10.0;
        issues.push("Has noscript fallback content (good)".to_string());
    }

    if result.framework_markers_found.len() > 2 {
        score -= 10.0;
        confidence_factors += 1;
    }

    result.confidence = if confidence_factors >= 3 {
        "high".to_string()
    } else if confidence_factors >= 2 {
        "medium".to_string()
    } else {
        "low".to_string()
    };

    result.likely_js_dependent = score < 50.0;
    result.score = score.clamp(0.0, 100.0);
    result.issues = issues;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_shell_flagged() {
        let html = r#"<html><body><div id="root"></div></body></html>"#;
        let r = detect_js_dependency(html);
        assert!(r.is_empty_shell);
        assert_eq!(r.severity, "blocking");
        assert_eq!(r.framework_detected.as_deref(), Some("React"));
    }

    #[test]
    fn rich_server_rendered_content_scores_high() {
        let body = "word ".repeat(200);
        let html = format!("<html><body><main><p>{body}</p></main></body></html>");
        let r = detect_js_dependency(&html);
        assert!(r.score >= 80.0);
        assert!(!r.likely_js_dependent);
    }

    #[test]
    fn noscript_fallback_is_rewarded() {
        let body = "word ".repeat(200);
        let html = format!(
            "<html><body><main><p>{body}</p></main><noscript>{}</noscript></body></html>",
            "a".repeat(150)
        );
        let r = detect_js_dependency(&html);
        assert!(r.has_noscript_fallback);
    }
}
