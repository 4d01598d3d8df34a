//! The persistence interface the core consumes. The core never talks
//! to a database driver directly — `findable-persistence` ships the only
//! concrete (in-memory) adapter; a real deployment wires up its own.

use crate::calibration::{CalibrationConfig, CalibrationExperiment, CalibrationSample, DriftAlert};
use crate::crawl::CrawlResult;
use crate::embedding::StoredEmbedding;
use crate::error::FindableResult;
use crate::run::Run;
use crate::site::Site;
use async_trait::async_trait;

#[async_trait]
pub trait PersistenceStore: Send + Sync {
    async fn get_site(&self, id: &str) -> FindableResult<Option<Site>>;
    async fn put_site(&self, site: Site) -> FindableResult<()>;

    async fn get_run(&self, id: &str) -> FindableResult<Option<Run>>;
    async fn put_run(&self, run: Run) -> FindableResult<()>;

    /// Writer-enforced invariant: `sum(weights) == 100 +/- eps`.
    async fn put_calibration_config(&self, config: CalibrationConfig) -> FindableResult<()>;
    async fn get_active_calibration_config(
        &self,
        arm: Option<crate::calibration::ExperimentArm>,
    ) -> FindableResult<Option<CalibrationConfig>>;

    async fn put_calibration_experiment(
        &self,
        experiment: CalibrationExperiment,
    ) -> FindableResult<()>;
    async fn get_calibration_experiment(
        &self,
        id: &str,
    ) -> FindableResult<Option<CalibrationExperiment>>;

    /// Append-only: concurrent appenders are safe.
    async fn append_calibration_sample(&self, sample: CalibrationSample) -> FindableResult<()>;
    async fn list_calibration_samples(
        &self,
        since_days: u32,
    ) -> FindableResult<Vec<CalibrationSample>>;

    async fn put_drift_alert(&self, alert: DriftAlert) -> FindableResult<()>;
    async fn list_open_drift_alerts(&self) -> FindableResult<Vec<DriftAlert>>;

    async fn upsert_embeddings(&self, embeddings: Vec<StoredEmbedding>) -> FindableResult<()>;
    async fn list_embeddings(&self, site_id: &str) -> FindableResult<Vec<StoredEmbedding>>;

    async fn cache_crawl_result(&self, result: CrawlResult) -> FindableResult<()>;
    async fn get_cached_crawl_result(&self, domain: &str) -> FindableResult<Option<CrawlResult>>;
}
