//! Technical Readiness pillar: the first pillar computed, and the one the
//! rest of the score depends on in spirit — if a site isn't reachable at
//! all, nothing else matters. Combines robots-AI access, TTFB, llms.txt and
//! JS-accessibility sub-scores, plus a flat HTTPS check.

use findable_analyzers::{JsDetectionResult, LlmsTxtResult, RobotsAiAnalysis, TtfbAnalysis};
use findable_types::analyzer::{Issue, PillarComponent, ProgressLevel, SeverityLevel};
use findable_types::pillar::{Pillar, PillarScore};
use serde_json::json;

const ROBOTS_WEIGHT: f64 = 0.35;
const TTFB_WEIGHT: f64 = 0.30;
const LLMS_TXT_WEIGHT: f64 = 0.15;
const JS_WEIGHT: f64 = 0.10;
const HTTPS_WEIGHT: f64 = 0.10;

pub struct TechnicalInputs<'a> {
    pub robots: Option<&'a RobotsAiAnalysis>,
    pub ttfb: Option<&'a TtfbAnalysis>,
    pub llms_txt: Option<&'a LlmsTxtResult>,
    pub js: Option<&'a JsDetectionResult>,
    pub is_https: bool,
    pub pillar_weight: f64,
}

pub struct TechnicalResult {
    pub pillar: PillarScore,
    pub critical_issues: Vec<Issue>,
    pub all_issues: Vec<Issue>,
}

pub fn score_technical(inputs: &TechnicalInputs) -> TechnicalResult {
    let mut components = Vec::new();
    let mut critical_issues = Vec::new();
    let mut all_issues = Vec::new();

    components.push(score_robots(inputs.robots, &mut critical_issues, &mut all_issues));
    components.push(score_ttfb(inputs.ttfb, &mut critical_issues, &mut all_issues));
    components.push(score_llms_txt(inputs.llms_txt, &mut all_issues));
    components.push(score_js(inputs.js, &mut critical_issues, &mut all_issues));
    components.push(score_https(inputs.is_https, &mut all_issues));

    let total_score: f64 = components.iter().map(|c| c.weighted_score).sum();
    let has_empty_shell = inputs.js.map(|j| j.is_empty_shell).unwrap_or(false);

    let explanation = if has_empty_shell {
        "Page appears to be a JavaScript shell with no server-rendered content".to_string()
    } else if total_score >= 80.0 {
        "Technically ready: crawlable, fast, and accessible without JavaScript".to_string()
    } else if total_score >= 50.0 {
        "Partially technically ready; see component breakdown".to_string()
    } else {
        "Technical access is limited; fix the critical issues first".to_string()
    };

    let mut pillar = PillarScore::evaluated(Pillar::Technical, total_score, inputs.pillar_weight, explanation, components);
    if has_empty_shell {
        pillar.level = ProgressLevel::Limited;
    }

    TechnicalResult {
        pillar,
        critical_issues,
        all_issues,
    }
}

fn score_robots(
    result: Option<&RobotsAiAnalysis>,
    critical_issues: &mut Vec<Issue>,
    all_issues: &mut Vec<Issue>,
) -> PillarComponent {
    let Some(result) = result else {
        return PillarComponent::new("Crawler Access", 100.0, ROBOTS_WEIGHT, "Not checked (assumed allowed)", json!({}));
    };

    let explanation = if !result.blocked_search_agents.is_empty() {
        format!(
            "Search engines blocked: {}. AI systems cannot find your content via search indexes.",
            result.blocked_search_agents.join(", ")
        )
    } else if !result.blocked_direct_agents.is_empty() {
        format!(
            "AI crawlers blocked: {}. Your content is still visible via search indexes (search: {:.0}/100).",
            result.blocked_direct_agents.join(", "),
            result.search_indexed_score
        )
    } else if result.score >= 80.0 {
        "All crawlers allowed. Full visibility via both search indexes and direct AI access.".to_string()
    } else {
        "Partial crawler access".to_string()
    };

    if !result.blocked_search_agents.is_empty() {
        critical_issues.push(Issue::new(
            format!(
                "Search engines blocked in robots.txt: {}. Most AI systems source content from search indexes - blocking these prevents AI visibility entirely.",
                result.blocked_search_agents.join(", ")
            ),
            SeverityLevel::Critical,
        ));
        all_issues.push(Issue::new(
            format!("Search engines blocked: {}", result.blocked_search_agents.join(", ")),
            SeverityLevel::Critical,
        ));
    }
    if !result.blocked_direct_agents.is_empty() {
        all_issues.push(Issue::new(
            format!(
                "AI crawlers blocked: {} (direct-crawl limited, but search-indexed visibility: {:.0}%)",
                result.blocked_direct_agents.join(", "),
                result.search_indexed_score
            ),
            SeverityLevel::Warning,
        ));
    }

    PillarComponent::new(
        "Crawler Access",
        result.score,
        ROBOTS_WEIGHT,
        explanation,
        json!({
            "search_indexed_score": result.search_indexed_score,
            "direct_crawl_score": result.direct_crawl_score,
            "blocked_search_agents": result.blocked_search_agents,
            "blocked_direct_agents": result.blocked_direct_agents,
            "summary": result.summary,
        }),
    )
}

fn score_ttfb(result: Option<&TtfbAnalysis>, critical_issues: &mut Vec<Issue>, all_issues: &mut Vec<Issue>) -> PillarComponent {
    let Some(result) = result else {
        return PillarComponent::new("TTFB Performance", 50.0, TTFB_WEIGHT, "Not measured", json!({}));
    };

    let explanation = if result.score >= 80.0 {
        format!("TTFB excellent: {}ms", result.ttfb_ms)
    } else if result.score >= 50.0 {
        format!("TTFB acceptable: {}ms (target: <500ms)", result.ttfb_ms)
    } else {
        format!("TTFB too slow: {}ms (AI crawlers may timeout)", result.ttfb_ms)
    };

    if result.ttfb_ms > 1500 {
        critical_issues.push(Issue::new(
            format!("TTFB critically slow: {}ms (target: <500ms)", result.ttfb_ms),
            SeverityLevel::Critical,
        ));
    } else if result.ttfb_ms > 500 {
        all_issues.push(Issue::new(format!("TTFB slow: {}ms (target: <500ms)", result.ttfb_ms), SeverityLevel::Warning));
    }

    PillarComponent::new("TTFB Performance", result.score, TTFB_WEIGHT, explanation, json!({"ttfb_ms": result.ttfb_ms}))
}

fn score_llms_txt(result: Option<&LlmsTxtResult>, all_issues: &mut Vec<Issue>) -> PillarComponent {
    let Some(result) = result else {
        return PillarComponent::new("llms.txt", 0.0, LLMS_TXT_WEIGHT, "Not checked", json!({}));
    };

    if !result.exists {
        all_issues.push(Issue::new("llms.txt not found (recommend creating)", SeverityLevel::Warning));
        return PillarComponent::new(
            "llms.txt",
            0.0,
            LLMS_TXT_WEIGHT,
            "Not found (recommend creating for AI visibility)",
            json!({}),
        );
    }

    for issue in &result.issues {
        all_issues.push(Issue::new(issue.clone(), SeverityLevel::Warning));
    }

    let explanation = if result.quality_score >= 80.0 {
        format!("Well-structured with {} links", result.link_count)
    } else if result.quality_score >= 50.0 {
        "Exists but could be improved".to_string()
    } else {
        "Exists but poorly structured".to_string()
    };

    PillarComponent::new(
        "llms.txt",
        result.quality_score,
        LLMS_TXT_WEIGHT,
        explanation,
        json!({
            "link_count": result.link_count,
            "has_title": result.has_title,
            "has_description": result.has_description,
        }),
    )
}

fn score_js(result: Option<&JsDetectionResult>, critical_issues: &mut Vec<Issue>, all_issues: &mut Vec<Issue>) -> PillarComponent {
    let Some(result) = result else {
        return PillarComponent::new("JS Accessibility", 100.0, JS_WEIGHT, "Not checked (assumed accessible)", json!({}));
    };

    if result.is_empty_shell {
        critical_issues.push(Issue::new(
            format!(
                "CRITICAL: Page appears empty to AI crawlers. Only {} chars of content detected. Implement server-side rendering (SSR) or static site generation (SSG) immediately.",
                result.main_content_length
            ),
            SeverityLevel::Critical,
        ));
    } else if result.likely_js_dependent {
        if result.confidence == "high" {
            let framework_info = result
                .framework_detected
                .as_ref()
                .map(|f| format!(" ({f})"))
                .unwrap_or_default();
            critical_issues.push(Issue::new(
                format!(
                    "Site requires JavaScript to render content{framework_info}. AI crawlers like GPTBot and ClaudeBot cannot execute JS. Enable SSR/prerendering for AI visibility."
                ),
                SeverityLevel::Critical,
            ));
        } else {
            all_issues.push(Issue::new(
                format!("Site may require JavaScript ({} confidence). Verify content is visible without JS.", result.confidence),
                SeverityLevel::Warning,
            ));
        }
    }

    let explanation = if result.is_empty_shell {
        format!(
            "Page is a JS shell ({} chars visible). AI crawlers see empty content. SSR required.",
            result.main_content_length
        )
    } else if result.score >= 80.0 {
        "Content accessible without JavaScript".to_string()
    } else if result.score >= 50.0 {
        format!("May require JS ({} confidence)", result.confidence)
    } else {
        let framework = result.framework_detected.clone().unwrap_or_else(|| "SPA".to_string());
        format!("Likely requires JS to render ({framework})")
    };

    PillarComponent::new(
        "JS Accessibility",
        result.score,
        JS_WEIGHT,
        explanation,
        json!({
            "framework": result.framework_detected,
            "main_content_length": result.main_content_length,
            "is_empty_shell": result.is_empty_shell,
            "severity": result.severity,
        }),
    )
}

fn score_https(is_https: bool, all_issues: &mut Vec<Issue>) -> PillarComponent {
    if is_https {
        PillarComponent::new("HTTPS", 100.0, HTTPS_WEIGHT, "Site uses HTTPS", json!({}))
    } else {
        all_issues.push(Issue::new("Site not using HTTPS", SeverityLevel::Warning));
        PillarComponent::new("HTTPS", 0.0, HTTPS_WEIGHT, "Site not using HTTPS (trust signal missing)", json!({}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_analyzers::analyze_robots_ai;
    use std::time::Duration;

    #[test]
    fn all_green_scores_high() {
        let robots = analyze_robots_ai("");
        let ttfb = findable_analyzers::analyze_ttfb(Duration::from_millis(100));
        let inputs = TechnicalInputs {
            robots: Some(&robots),
            ttfb: Some(&ttfb),
            llms_txt: None,
            js: None,
            is_https: true,
            pillar_weight: 20.0,
        };
        let result = score_technical(&inputs);
        assert!(result.pillar.raw_score > 70.0);
        assert!(result.critical_issues.is_empty());
    }

    #[test]
    fn empty_js_shell_forces_limited_level() {
        let html = r#"<html><body><div id="root"></div></body></html>"#;
        let js = findable_analyzers::detect_js_dependency(html);
        let inputs = TechnicalInputs {
            robots: None,
            ttfb: None,
            llms_txt: None,
            js: Some(&js),
            is_https: true,
            pillar_weight: 20.0,
        };
        let result = score_technical(&inputs);
        assert_eq!(result.pillar.level, ProgressLevel::Limited);
        assert!(!result.critical_issues.is_empty());
    }

    #[test]
    fn blocked_search_engine_is_critical() {
        let robots = analyze_robots_ai("User-agent: Googlebot\nDisallow: /\n");
        let inputs = TechnicalInputs {
            robots: Some(&robots),
            ttfb: None,
            llms_txt: None,
            js: None,
            is_https: true,
            pillar_weight: 20.0,
        };
        let result = score_technical(&inputs);
        assert!(result
            .critical_issues
            .iter()
            .any(|i| i.message.contains("Search engines blocked")));
    }
}
