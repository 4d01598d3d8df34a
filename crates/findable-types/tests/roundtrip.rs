//! §8 round-trip/idempotence laws: serialize -> deserialize is lossless for
//! the core value objects.

use chrono::Utc;
use findable_types::calibration::{
    AnswerabilityThresholds, CalibrationConfig, CalibrationSample, CalibrationStatus,
    OutcomeMatch, ScoringSubWeights,
};
use findable_types::crawl::{CrawlPage, CrawlResult, Surface};
use findable_types::extraction::{ExtractedPage, PageMetadata};
use findable_types::pillar::Pillar;
use findable_types::question::{Answerability, Difficulty, QuestionCategory};
use findable_types::score::{FindableScore, Grade};
use std::collections::HashMap;

#[test]
fn crawl_result_round_trips() {
    let page = CrawlPage {
        url: "https://example.com/".into(),
        final_url: "https://example.com/".into(),
        title: Some("Home".into()),
        html: "<html></html>".into(),
        content_type: Some("text/html".into()),
        status_code: 200,
        depth: 0,
        fetch_time_ms: 120,
        fetched_at: Utc::now(),
        links_found: 3,
        surface: Surface::Marketing,
    };
    let result = CrawlResult {
        domain: "example.com".into(),
        start_url: "https://example.com/".into(),
        pages: vec![page],
        urls_discovered: 5,
        urls_crawled: 1,
        urls_skipped: 1,
        urls_failed: 0,
        started_at: Utc::now(),
        completed_at: Utc::now(),
        duration_seconds: 1.5,
        robots_respected: true,
        max_depth_reached: 0,
        docs_pages_crawled: 0,
        marketing_pages_crawled: 1,
        docs_surface_detected: false,
    };

    let json = serde_json::to_string(&result).unwrap();
    let back: CrawlResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.domain, result.domain);
    assert_eq!(back.pages.len(), result.pages.len());
    assert_eq!(back.pages[0].url, result.pages[0].url);
}

#[test]
fn extracted_page_round_trips() {
    let page = ExtractedPage::new(
        "https://example.com/about".into(),
        Some("About".into()),
        "Some main content here.".into(),
        "Some main content here. Footer text.".into(),
        PageMetadata::default(),
        1,
        Utc::now(),
        500,
    );
    let json = serde_json::to_string(&page).unwrap();
    let back: ExtractedPage = serde_json::from_str(&json).unwrap();
    assert_eq!(back.url, page.url);
    assert_eq!(back.word_count, page.word_count);
}

#[test]
fn findable_score_round_trips() {
    let score = FindableScore {
        total_score: 82.5,
        grade: Grade::from_score(82.5),
        pillars: vec![],
        pillars_evaluated: 6,
        pillars_not_evaluated: 0,
        is_partial: false,
        max_evaluated_points: 100.0,
        evaluated_score_pct: 82.5,
        critical_issues: vec!["robots blocks Googlebot".into()],
        fixes: vec!["add an FAQPage schema block".into()],
    };
    let json = serde_json::to_string(&score).unwrap();
    let back: FindableScore = serde_json::from_str(&json).unwrap();
    assert_eq!(back.total_score, score.total_score);
    assert_eq!(back.grade, Grade::B);
}

#[test]
fn calibration_sample_round_trips() {
    let sample = CalibrationSample {
        id: "s1".into(),
        question_id: "q1".into(),
        sim_answerability: Answerability::Fully,
        sim_score: 0.85,
        sim_signals_found: 3,
        sim_signals_total: 3,
        obs_mentioned: true,
        obs_cited: false,
        outcome_match: OutcomeMatch::TruePositive,
        prediction_accurate: true,
        question_category: QuestionCategory::Identity,
        difficulty: Difficulty::Easy,
        experiment_id: None,
        arm: None,
        recorded_at: Utc::now(),
    };
    let json = serde_json::to_string(&sample).unwrap();
    let back: CalibrationSample = serde_json::from_str(&json).unwrap();
    assert_eq!(back.id, sample.id);
    assert_eq!(back.outcome_match, OutcomeMatch::TruePositive);
}

#[test]
fn calibration_config_weight_sum_invariant() {
    let mut weights = HashMap::new();
    weights.insert(Pillar::Technical, 20.0);
    weights.insert(Pillar::Structure, 20.0);
    weights.insert(Pillar::Schema, 15.0);
    weights.insert(Pillar::Authority, 15.0);
    weights.insert(Pillar::Retrieval, 20.0);
    weights.insert(Pillar::Coverage, 10.0);

    let config = CalibrationConfig {
        id: "default".into(),
        pillar_weights: weights,
        thresholds: AnswerabilityThresholds::default(),
        signal_match_threshold: 0.5,
        scoring_sub_weights: ScoringSubWeights::default(),
        status: CalibrationStatus::Active,
    };
    assert!(config.is_valid());

    let mut bad = config.clone();
    bad.thresholds.fully_answerable = 0.2;
    bad.thresholds.partially_answerable = 0.3;
    assert!(!bad.is_valid());
}
