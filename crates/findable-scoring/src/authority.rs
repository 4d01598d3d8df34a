//! Authority pillar: wraps `findable_analyzers::AuthorityAnalysis` into a
//! `PillarScore`, breaking its flat point total back into the same named
//! components the analyzer awards points for.

use findable_analyzers::AuthorityAnalysis;
use findable_types::analyzer::{Issue, PillarComponent, SeverityLevel};
use findable_types::pillar::{Pillar, PillarScore};
use serde_json::json;

pub struct AuthorityResult {
    pub pillar: PillarScore,
    pub issues: Vec<Issue>,
}

pub fn score_authority(analysis: &AuthorityAnalysis, pillar_weight: f64) -> AuthorityResult {
    let author = PillarComponent::new(
        "Author Attribution",
        if analysis.has_author { 100.0 } else { 0.0 },
        0.25,
        match &analysis.author_name {
            Some(name) => format!("Author attributed: {name}"),
            None => "No author attribution found".to_string(),
        },
        json!({}),
    );
    let credentials = PillarComponent::new(
        "Stated Credentials",
        if analysis.has_credentials { 100.0 } else { 0.0 },
        0.15,
        if analysis.has_credentials {
            "Credentials or expertise signals present"
        } else {
            "No credentials or expertise signals found"
        },
        json!({}),
    );
    let dates = PillarComponent::new(
        "Publication & Update Dates",
        if analysis.has_published_date { 75.0 } else { 0.0 } + if analysis.has_modified_date { 25.0 } else { 0.0 },
        0.20,
        if analysis.has_published_date {
            "Publication date visible"
        } else {
            "No visible publication date"
        },
        json!({"has_modified_date": analysis.has_modified_date}),
    );
    let original_data = PillarComponent::new(
        "Original Data & Research",
        if analysis.has_original_data { 100.0 } else { 0.0 },
        0.15,
        if analysis.has_original_data {
            "Original data, tables or research claims present"
        } else {
            "No original data or research claims detected"
        },
        json!({}),
    );
    let citations_raw = if analysis.authoritative_citations > 0 {
        (analysis.authoritative_citations as f64 * 20.0).min(100.0)
    } else {
        0.0
    };
    let citations = PillarComponent::new(
        "Authoritative Citations",
        citations_raw,
        0.25,
        format!(
            "{} of {} outbound citation(s) point to authoritative domains",
            analysis.authoritative_citations, analysis.total_citations
        ),
        json!({"total_citations": analysis.total_citations}),
    );

    let issues: Vec<Issue> = analysis
        .issues
        .iter()
        .map(|msg| Issue::new(msg.clone(), SeverityLevel::from_score(analysis.score)))
        .collect();

    let explanation = format!("Authority signals score {:.0}/100 ({})", analysis.score, analysis.level);
    let pillar = PillarScore::evaluated(
        Pillar::Authority,
        analysis.score,
        pillar_weight,
        explanation,
        vec![author, credentials, dates, original_data, citations],
    );

    AuthorityResult { pillar, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_analyzers::analyze_authority;

    #[test]
    fn no_signals_yields_five_zeroed_components() {
        let analysis = analyze_authority("<html><body><p>hello</p></body></html>", None, None);
        let result = score_authority(&analysis, 15.0);
        assert_eq!(result.pillar.components.len(), 5);
        assert_eq!(result.pillar.raw_score, analysis.score);
    }
}
