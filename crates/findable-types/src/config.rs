//! Recognized configuration options.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The ~20 high-value paths injected into the frontier at depth 0.
pub fn default_priority_paths() -> Vec<String> {
    [
        "/about",
        "/pricing",
        "/docs",
        "/faq",
        "/blog",
        "/product",
        "/products",
        "/features",
        "/contact",
        "/support",
        "/help",
        "/api",
        "/developers",
        "/getting-started",
        "/guide",
        "/solutions",
        "/customers",
        "/case-studies",
        "/integrations",
        "/changelog",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub max_pages: usize,
    pub max_depth: u32,
    pub timeout: Duration,
    pub user_agent: String,
    pub respect_robots: bool,
    pub follow_external_links: bool,
    pub concurrency: usize,
    pub min_delay: Duration,
    pub priority_paths: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_pages: 250,
            max_depth: 3,
            timeout: Duration::from_secs(30),
            user_agent: "FindableBot/1.0".to_string(),
            respect_robots: true,
            follow_external_links: false,
            concurrency: 5,
            min_delay: Duration::from_millis(500),
            priority_paths: default_priority_paths(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub max_pages: usize,
    pub max_depth: u32,
    pub cache_ttl_hours: u64,
    pub run_technical: bool,
    pub run_structure: bool,
    pub run_schema: bool,
    pub run_authority: bool,
    pub run_simulation: bool,
    pub concurrent_extractions: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_depth: 2,
            cache_ttl_hours: 24,
            run_technical: true,
            run_structure: true,
            run_schema: true,
            run_authority: true,
            run_simulation: true,
            concurrent_extractions: 5,
        }
    }
}

/// Validation batch concurrency: `run_pipeline_batch` /
/// `collect_ground_truth_batch`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationBatchConfig {
    pub site_concurrency: usize,
    pub query_concurrency: usize,
}

impl Default for ValidationBatchConfig {
    fn default() -> Self {
        Self {
            site_concurrency: 3,
            query_concurrency: 2,
        }
    }
}
