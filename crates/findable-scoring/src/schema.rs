//! Schema pillar: wraps `findable_analyzers::SchemaAnalysis` into a
//! `PillarScore` with two components — type coverage and FAQ/validity
//! bonus-or-penalty — since the analyzer itself already folds those into a
//! single score.

use findable_analyzers::SchemaAnalysis;
use findable_types::analyzer::{Issue, PillarComponent, SeverityLevel};
use findable_types::pillar::{Pillar, PillarScore};
use serde_json::json;

const TYPE_COVERAGE_WEIGHT: f64 = 0.6;
const VALIDITY_WEIGHT: f64 = 0.4;

pub struct SchemaResult {
    pub pillar: PillarScore,
    pub issues: Vec<Issue>,
}

pub fn score_schema(analysis: &SchemaAnalysis, pillar_weight: f64) -> SchemaResult {
    let type_coverage_raw = if analysis.types_found.is_empty() {
        0.0
    } else {
        (40.0 + analysis.recognized_type_count as f64 * 15.0).min(100.0)
    };
    let type_coverage = PillarComponent::new(
        "Structured Data Types",
        type_coverage_raw,
        TYPE_COVERAGE_WEIGHT,
        format!(
            "{} recognized schema.org type(s) found: {}",
            analysis.recognized_type_count,
            if analysis.types_found.is_empty() { "none".to_string() } else { analysis.types_found.join(", ") }
        ),
        json!({"types_found": analysis.types_found}),
    );

    let validity_raw = if analysis.block_errors.is_empty() {
        if analysis.has_faq_page {
            100.0
        } else if analysis.types_found.is_empty() {
            0.0
        } else {
            80.0
        }
    } else {
        (80.0 - analysis.block_errors.len() as f64 * 20.0).max(0.0)
    };
    let validity = PillarComponent::new(
        "Block Validity & FAQ Bonus",
        validity_raw,
        VALIDITY_WEIGHT,
        if analysis.block_errors.is_empty() {
            "No malformed schema blocks".to_string()
        } else {
            format!("{} schema block(s) missing recommended fields", analysis.block_errors.len())
        },
        json!({"has_faq_page": analysis.has_faq_page, "faq_question_count": analysis.faq_question_count}),
    );

    let issues: Vec<Issue> = analysis
        .issues
        .iter()
        .map(|msg| Issue::new(msg.clone(), SeverityLevel::from_score(analysis.score)))
        .collect();

    let explanation = if analysis.types_found.is_empty() {
        "No structured data found; AI systems cannot read entity metadata directly".to_string()
    } else {
        format!("{} recognized type(s), scoring {:.0}/100", analysis.recognized_type_count, analysis.score)
    };

    let pillar = PillarScore::evaluated(
        Pillar::Schema,
        analysis.score,
        pillar_weight,
        explanation,
        vec![type_coverage, validity],
    );

    SchemaResult { pillar, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_analyzers::analyze_schema;

    #[test]
    fn no_schema_scores_zero_with_two_components() {
        let analysis = analyze_schema("<html></html>", &[]);
        let result = score_schema(&analysis, 15.0);
        assert_eq!(result.pillar.components.len(), 2);
        assert_eq!(result.pillar.raw_score, 0.0);
    }

    #[test]
    fn faq_page_scores_high() {
        let html = r#"<script type="application/ld+json">
            {"@type": "FAQPage", "mainEntity": [
                {"@type": "Question", "name": "Q1"},
                {"@type": "Question", "name": "Q2"},
                {"@type": "Question", "name": "Q3"}
            ]}
        </script>"#;
        let analysis = analyze_schema(html, &[]);
        let result = score_schema(&analysis, 15.0);
        assert!(result.pillar.raw_score >= 80.0);
    }
}
