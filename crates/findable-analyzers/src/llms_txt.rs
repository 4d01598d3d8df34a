//! llms.txt detection and validation, plus a template generator.
//!
//! llms.txt (<https://llmstxt.org>) is a robots.txt-like convention aimed at
//! LLMs: a plain-text/Markdown file at `/llms.txt` that helps them discover
//! and prioritize a site's content rather than rules out crawling.

use findable_fetch::PoliteFetcher;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^##\s+(.+)$").unwrap());
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)(?:\s*[-:]?\s*(.+))?").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmsTxtLink {
    pub text: String,
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmsTxtResult {
    pub exists: bool,
    pub url: String,
    pub quality_score: f64,
    pub level: String,
    pub has_title: bool,
    pub has_description: bool,
    pub has_sections: bool,
    pub has_links: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub sections: Vec<String>,
    pub links: Vec<LlmsTxtLink>,
    pub link_count: usize,
    pub issues: Vec<String>,
}

impl LlmsTxtResult {
    fn missing(url: String) -> Self {
        Self {
            exists: false,
            url,
            level: "missing".to_string(),
            ..Default::default()
        }
    }
}

/// Fetches `/llms.txt` on `site_url`'s origin and validates it. Any URL on
/// the site works; only scheme and host are used.
pub async fn check_llms_txt(fetcher: &PoliteFetcher, site_url: &str) -> LlmsTxtResult {
    let Ok(parsed) = url::Url::parse(site_url) else {
        return LlmsTxtResult::missing(String::new());
    };
    let Some(host) = parsed.host_str() else {
        return LlmsTxtResult::missing(String::new());
    };
    let llms_txt_url = format!("{}://{}/llms.txt", parsed.scheme(), host);

    match fetcher.fetch(&llms_txt_url, None).await {
        Ok(outcome) if outcome.status == 200 => {
            let mut result = LlmsTxtResult {
                exists: true,
                url: llms_txt_url,
                ..Default::default()
            };
            parse_content(&mut result, &outcome.body);
            calculate_quality_score(&mut result);
            result
        }
        _ => LlmsTxtResult::missing(llms_txt_url),
    }
}

fn parse_content(result: &mut LlmsTxtResult, content: &str) {
    for line in content.lines() {
        let line = line.trim();
        if let Some(title) = line.strip_prefix("# ") {
            result.has_title = true;
            result.title = Some(title.trim().to_string());
            break;
        }
    }

    for line in content.lines() {
        let line = line.trim();
        if let Some(desc) = line.strip_prefix("> ") {
            result.has_description = true;
            result.description = Some(desc.trim().to_string());
            break;
        }
    }

    let sections: Vec<String> = SECTION_RE
        .captures_iter(content)
        .map(|c| c[1].trim().to_string())
        .collect();
    if !sections.is_empty() {
        result.has_sections = true;
        result.sections = sections;
    }

    for caps in LINK_RE.captures_iter(content) {
        let text = caps[1].trim().to_string();
        let url = caps[2].trim().to_string();
        let description = caps.get(3).map(|m| m.as_str().trim().to_string());
        result.links.push(LlmsTxtLink { text, url, description });
    }
    result.link_count = result.links.len();
    result.has_links = result.link_count > 0;

    if !result.has_title {
        result.issues.push("Missing title (# heading)".to_string());
    }
    if !result.has_description {
        result.issues.push("Missing description (> blockquote)".to_string());
    }
    if !result.has_links {
        result.issues.push("No links found".to_string());
    }
    if result.link_count > 0 && result.link_count < 3 {
        result.issues.push("Very few links (recommend 5+)".to_string());
    }
    if content.len() > 50_000 {
        result.issues.push("File too large (>50KB), may slow parsing".to_string());
    }
}

fn calculate_quality_score(result: &mut LlmsTxtResult) {
    let mut score = 0.0;
    if result.has_title {
        score += 20.0;
    }
    if result.has_description {
        score += 20.0;
    }
    if result.has_sections {
        score += 15.0;
    }
    if result.has_links {
        score += (result.link_count as f64 * 4.5).min(45.0);
    }
    result.quality_score = score;
    result.level = if score >= 80.0 {
        "excellent".to_string()
    } else if score >= 50.0 {
        "good".to_string()
    } else if score > 0.0 {
        "poor".to_string()
    } else {
        "missing".to_string()
    };
}

/// Builds a starter llms.txt body from a site name, description and a map
/// of section name to `(link text, url, description)` triples.
pub fn generate_llms_txt_template(
    site_name: &str,
    description: &str,
    sections: &[(String, Vec<(String, String, String)>)],
) -> String {
    let mut lines = vec![format!("# {site_name}"), String::new(), format!("> {description}"), String::new()];
    for (section_name, links) in sections {
        lines.push(format!("## {section_name}"));
        lines.push(String::new());
        for (text, url, desc) in links {
            lines.push(format!("- [{text}]({url}): {desc}"));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_llms_txt() {
        let content = "# Acme\n\n> We make widgets.\n\n## Products\n\n[Widget A](/a): Our flagship widget\n[Widget B](/b): A second widget\n[Widget C](/c): A third widget\n";
        let mut result = LlmsTxtResult::default();
        parse_content(&mut result, content);
        calculate_quality_score(&mut result);
        assert!(result.has_title);
        assert!(result.has_description);
        assert!(result.has_sections);
        assert_eq!(result.link_count, 3);
        assert!(result.quality_score >= 50.0);
    }

    #[test]
    fn missing_structure_flags_issues() {
        let mut result = LlmsTxtResult::default();
        parse_content(&mut result, "just some text");
        calculate_quality_score(&mut result);
        assert_eq!(result.level, "missing");
        assert!(result.issues.iter().any(|i| i.contains("title")));
    }

    #[test]
    fn template_generator_produces_expected_shape() {
        let sections = vec![(
            "Products".to_string(),
            vec![("Product A".to_string(), "/products/a".to_string(), "Our main product".to_string())],
        )];
        let out = generate_llms_txt_template("Acme", "We build things.", &sections);
        assert!(out.starts_with("# Acme\n"));
        assert!(out.contains("> We build things."));
        assert!(out.contains("## Products"));
        assert!(out.contains("[Product A](/products/a): Our main product"));
    }
}
