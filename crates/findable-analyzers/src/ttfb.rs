//! Time-to-first-byte scoring.
//!
//! AI crawlers often enforce a strict retrieval budget (1-5 seconds across
//! the whole fetch); a slow TTFB eats into that budget before a single byte
//! of content has arrived. `findable_fetch::PoliteFetcher` already measures
//! TTFB for every fetch, so this module only scores the `Duration`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const EXCELLENT_MS: u128 = 200;
const GOOD_MS: u128 = 500;
const ACCEPTABLE_MS: u128 = 1000;
const POOR_MS: u128 = 1500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtfbAnalysis {
    pub ttfb_ms: u128,
    pub score: f64,
    pub level: String,
    pub is_acceptable: bool,
    pub is_critical: bool,
}

pub fn analyze_ttfb(ttfb: Duration) -> TtfbAnalysis {
    let ttfb_ms = ttfb.as_millis();
    let (score, level) = score_ttfb_ms(ttfb_ms);
    TtfbAnalysis {
        ttfb_ms,
        score,
        level,
        is_acceptable: ttfb_ms < ACCEPTABLE_MS,
        is_critical: ttfb_ms >= POOR_MS + 500,
    }
}

fn score_ttfb_ms(ttfb_ms: u128) -> (f64, String) {
    if ttfb_ms < EXCELLENT_MS {
        return (100.0, "excellent".to_string());
    }
    if ttfb_ms < GOOD_MS {
        let ratio = (ttfb_ms - EXCELLENT_MS) as f64 / (GOOD_MS - EXCELLENT_MS) as f64;
        return (100.0 - ratio * 20.0, "good".to_string());
    }
    if ttfb_ms < ACCEPTABLE_MS {
        let ratio = (ttfb_ms - GOOD_MS) as f64 / (ACCEPTABLE_MS - GOOD_MS) as f64;
        return (80.0 - ratio * 30.0, "acceptable".to_string());
    }
    if ttfb_ms < POOR_MS {
        let ratio = (ttfb_ms - ACCEPTABLE_MS) as f64 / (POOR_MS - ACCEPTABLE_MS) as f64;
        return (50.0 - ratio * 25.0, "poor".to_string());
    }
    let ratio = ((ttfb_ms - POOR_MS) as f64 / 1000.0).min(1.0);
    ((25.0 - ratio * 25.0).max(0.0), "critical".to_string())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteTtfbAnalysis {
    pub avg_ttfb_ms: u128,
    pub min_ttfb_ms: u128,
    pub max_ttfb_ms: u128,
    pub score: f64,
    pub level: String,
    pub pages_measured: usize,
}

/// Aggregates a sampled set of per-page TTFB measurements into a single
/// site-level score, driven by the average.
pub fn analyze_site_ttfb(samples: &[Duration]) -> SiteTtfbAnalysis {
    if samples.is_empty() {
        return SiteTtfbAnalysis {
            level: "critical".to_string(),
            ..Default::default()
        };
    }
    let values_ms: Vec<u128> = samples.iter().map(|d| d.as_millis()).collect();
    let avg = values_ms.iter().sum::<u128>() / values_ms.len() as u128;
    let (score, level) = score_ttfb_ms(avg);
    SiteTtfbAnalysis {
        avg_ttfb_ms: avg,
        min_ttfb_ms: *values_ms.iter().min().unwrap(),
        max_ttfb_ms: *values_ms.iter().max().unwrap(),
        score,
        level,
        pages_measured: samples.len(),
    }
}
