//! Schema.org structured-data richness: presence and field-completeness of
//! the common types, plus a bonus for a well-formed `FAQPage`.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Required fields per well-known `@type`, used only to flag an incomplete
/// block as an error (never to reject the type as absent).
fn required_fields(type_name: &str) -> &'static [&'static str] {
    match type_name {
        "Organization" => &["name", "url"],
        "Article" | "BlogPosting" | "NewsArticle" => &["headline", "datePublished"],
        "FAQPage" => &["mainEntity"],
        "Product" => &["name"],
        "WebPage" => &["name"],
        "BreadcrumbList" => &["itemListElement"],
        "HowTo" => &["name", "step"],
        _ => &[],
    }
}

const SCORED_TYPES: &[&str] = &[
    "Organization",
    "Article",
    "BlogPosting",
    "NewsArticle",
    "Product",
    "FAQPage",
    "WebPage",
    "BreadcrumbList",
    "HowTo",
    "LocalBusiness",
    "Person",
    "SoftwareApplication",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaBlockIssue {
    pub schema_type: String,
    pub missing_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaAnalysis {
    pub types_found: Vec<String>,
    pub recognized_type_count: usize,
    pub has_faq_page: bool,
    pub faq_question_count: usize,
    pub block_errors: Vec<SchemaBlockIssue>,
    pub score: f64,
    pub level: String,
    pub issues: Vec<String>,
}

/// Walks every `<script type="application/ld+json">` block (following
/// `@graph`) plus microdata `itemtype`s, scoring presence/validity of the
/// common schema.org types and awarding a bonus for `FAQPage`.
pub fn analyze_schema(html: &str, schema_types_hint: &[String]) -> SchemaAnalysis {
    let doc = Html::parse_document(html);
    let mut result = SchemaAnalysis::default();
    let mut found: std::collections::BTreeSet<String> =
        schema_types_hint.iter().cloned().collect();

    if let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) {
        for el in doc.select(&selector) {
            let raw: String = el.text().collect();
            let Ok(value) = serde_json::from_str::<Value>(&raw) else {
                result
                    .issues
                    .push("Malformed JSON-LD block (invalid JSON)".to_string());
                continue;
            };
            walk_jsonld(&value, &mut found, &mut result);
        }
    }

    result.types_found = found.into_iter().collect();
    result.recognized_type_count = result
        .types_found
        .iter()
        .filter(|t| SCORED_TYPES.contains(&t.as_str()))
        .count();
    result.has_faq_page = result.types_found.iter().any(|t| t == "FAQPage");

    result.score = score(&result);
    result.level = if result.score >= 80.0 {
        "good".to_string()
    } else if result.score >= 40.0 {
        "warning".to_string()
    } else {
        "critical".to_string()
    };
    if result.types_found.is_empty() {
        result
            .issues
            .push("No structured data (JSON-LD or microdata) found".to_string());
    }
    result
}

fn walk_jsonld(value: &Value, found: &mut std::collections::BTreeSet<String>, result: &mut SchemaAnalysis) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk_jsonld(item, found, result);
            }
        }
        Value::Object(map) => {
            if let Some(graph) = map.get("@graph") {
                walk_jsonld(graph, found, result);
            }
            if let Some(type_value) = map.get("@type") {
                let type_names: Vec<String> = match type_value {
                    Value::String(s) => vec![s.clone()],
                    Value::Array(items) => items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                    _ => Vec::new(),
                };
                for type_name in type_names {
                    found.insert(type_name.clone());
                    let missing: Vec<String> = required_fields(&type_name)
                        .iter()
                        .filter(|f| !map.contains_key(**f))
                        .map(|f| f.to_string())
                        .collect();
                    if !missing.is_empty() {
                        result.issues.push(format!(
                            "{} block missing recommended field(s): {}",
                            type_name,
                            missing.join(", ")
                        ));
                        result.block_errors.push(SchemaBlockIssue {
                            schema_type: type_name.clone(),
                            missing_fields: missing,
                        });
                    }
                    if type_name == "FAQPage" {
                        if let Some(Value::Array(entities)) = map.get("mainEntity") {
                            result.faq_question_count += entities.len();
                        }
                    }
                }
            }
        }
        _ => {}
    }
}

fn score(result: &SchemaAnalysis) -> f64 {
    if result.types_found.is_empty() {
        return 0.0;
    }
    let mut score = 40.0 + (result.recognized_type_count as f64 * 15.0).min(40.0);
    if result.has_faq_page {
        score += 15.0;
        if result.faq_question_count >= 3 {
            score += 5.0;
        }
    }
    let error_penalty = (result.block_errors.len() as f64 * 5.0).min(30.0);
    (score - error_penalty).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_schema_scores_zero() {
        let r = analyze_schema("<html></html>", &[]);
        assert_eq!(r.score, 0.0);
    }

    #[test]
    fn faq_page_gets_bonus() {
        let html = r#"<script type="application/ld+json">
            {"@type": "FAQPage", "mainEntity": [
                {"@type": "Question", "name": "Q1"},
                {"@type": "Question", "name": "Q2"},
                {"@type": "Question", "name": "Q3"}
            ]}
        </script>"#;
        let r = analyze_schema(html, &[]);
        assert!(r.has_faq_page);
        assert_eq!(r.faq_question_count, 3);
        assert!(r.score >= 80.0);
    }

    #[test]
    fn incomplete_organization_flagged() {
        let html = r#"<script type="application/ld+json">{"@type": "Organization"}</script>"#;
        let r = analyze_schema(html, &[]);
        assert_eq!(r.block_errors.len(), 1);
    }
}
