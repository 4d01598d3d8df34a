//! The two configuration objects a run is parameterized by, per spec.md
//! §6: `CrawlConfig` (the spider/fetcher knobs) and `PipelineConfig` (which
//! analyzers to run, cache TTL, extraction concurrency). Both already live
//! in `findable_types::config`; this module only adds the one thing that
//! crosses crate boundaries — the calibration config a run scores against.

use findable_types::calibration::CalibrationConfig;
use findable_types::config::{CrawlConfig, PipelineConfig};
use serde::{Deserialize, Serialize};

/// Everything `run_audit` needs besides the target URL and a
/// `PersistenceStore`/`EventBus` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub crawl: CrawlConfig,
    pub pipeline: PipelineConfig,
    pub calibration: CalibrationConfig,
    /// Consult the crawl cache before crawling; `force_refresh` bypasses it
    /// even when a fresh cache entry exists, per spec.md §4.4's
    /// `get_cached_or_crawl(url, ..., use_cache, force_refresh)` contract.
    pub use_cache: bool,
    pub force_refresh: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            pipeline: PipelineConfig::default(),
            calibration: CalibrationConfig::default_active(),
            use_cache: true,
            force_refresh: false,
        }
    }
}
