//! Structure pillar: a thin wrapper turning `findable_analyzers::StructureAnalysis`
//! into a `PillarScore`. The composite's own sub-weights already sum to 1.0,
//! so this module's job is only to reshape the seven sub-scores into
//! `PillarComponent`s and surface the issues.

use findable_analyzers::StructureAnalysis;
use findable_types::analyzer::{Issue, PillarComponent, SeverityLevel};
use findable_types::pillar::{Pillar, PillarScore};
use serde_json::json;

const SUB_WEIGHTS: [(&str, f64); 7] = [
    ("Heading Hierarchy", 0.20),
    ("Answer-First Opening", 0.15),
    ("AI Answer Block", 0.15),
    ("Readability", 0.15),
    ("FAQ Coverage", 0.15),
    ("Internal Links", 0.10),
    ("Content Formats", 0.10),
];

pub struct StructureResult {
    pub pillar: PillarScore,
    pub issues: Vec<Issue>,
}

pub fn score_structure(analysis: &StructureAnalysis, pillar_weight: f64) -> StructureResult {
    let sub_scores = [
        &analysis.headings,
        &analysis.answer_first,
        &analysis.ai_answer_block,
        &analysis.readability,
        &analysis.faq,
        &analysis.links,
        &analysis.formats,
    ];

    let components: Vec<PillarComponent> = sub_scores
        .iter()
        .zip(SUB_WEIGHTS.iter())
        .map(|(sub, (name, weight))| {
            let explanation = if sub.issues.is_empty() {
                format!("{name} scores {:.0}/100", sub.score)
            } else {
                sub.issues.join("; ")
            };
            PillarComponent::new(*name, sub.score, *weight, explanation, json!({}))
        })
        .collect();

    let issues: Vec<Issue> = analysis
        .issues
        .iter()
        .map(|msg| {
            let severity = if analysis.score < 50.0 {
                SeverityLevel::Warning
            } else {
                SeverityLevel::Good
            };
            Issue::new(msg.clone(), severity)
        })
        .collect();

    let explanation = format!("Page structure scores {:.0}/100 ({})", analysis.score, analysis.level);
    let pillar = PillarScore::evaluated(Pillar::Structure, analysis.score, pillar_weight, explanation, components);

    StructureResult { pillar, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_analyzers::{analyze_headings, analyze_structure};

    #[test]
    fn wraps_composite_into_seven_components() {
        let html = "<html><body><h1>Widgets</h1><main><p>A widget is a small mechanical device that performs a specific task within a larger machine for users everywhere.</p></main></body></html>";
        let heading = analyze_headings(html);
        let analysis = analyze_structure(html, "https://example.com", &heading);
        let result = score_structure(&analysis, 20.0);
        assert_eq!(result.pillar.components.len(), 7);
        assert!(result.pillar.evaluated);
    }
}
