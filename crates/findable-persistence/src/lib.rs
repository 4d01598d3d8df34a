//! # Findable Persistence
//!
//! C16 of the audit pipeline: the persistence interface the core consumes.
//! `findable_types::ports::PersistenceStore` is the contract; this crate
//! ships the one concrete adapter the core needs to run standalone, an
//! in-memory store keyed the same way a real deployment's tables would be
//! (`sites`, `runs`, `calibration_configs`, `calibration_experiments`,
//! `calibration_samples` append-only, `calibration_drift_alerts`,
//! `embeddings` unique on `(content_hash, site_id)`, crawl-result cache
//! keyed by lowercased domain). A real deployment wires its own adapter
//! (Postgres/pgvector, Redis, ...) against the same trait; the core never
//! talks to a database driver directly.

use async_trait::async_trait;
use dashmap::DashMap;
use findable_types::calibration::{
    CalibrationConfig, CalibrationExperiment, CalibrationSample, DriftAlert, DriftAlertState,
    ExperimentArm,
};
use findable_types::crawl::CrawlResult;
use findable_types::embedding::StoredEmbedding;
use findable_types::error::FindableResult;
use findable_types::ports::PersistenceStore;
use findable_types::run::Run;
use findable_types::site::Site;
use std::sync::RwLock;

/// A process-local `PersistenceStore` backed by `DashMap`s, mirroring the
/// table layout spec.md §6 describes for a real deployment's schema. No
/// row ever blocks another table's readers/writers; the calibration
/// sample log is append-only by construction (`Vec` behind an `RwLock`,
/// never truncated or rewritten).
#[derive(Default)]
pub struct InMemoryStore {
    sites: DashMap<String, Site>,
    runs: DashMap<String, Run>,
    calibration_configs: DashMap<String, CalibrationConfig>,
    calibration_experiments: DashMap<String, CalibrationExperiment>,
    calibration_samples: RwLock<Vec<CalibrationSample>>,
    drift_alerts: DashMap<String, DriftAlert>,
    /// keyed by `(content_hash, site_id)` per spec.md §3's uniqueness rule.
    embeddings: DashMap<(String, String), StoredEmbedding>,
    /// keyed by lowercased domain, per C4's cache contract.
    crawl_cache: DashMap<String, CrawlResult>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceStore for InMemoryStore {
    async fn get_site(&self, id: &str) -> FindableResult<Option<Site>> {
        Ok(self.sites.get(id).map(|r| r.value().clone()))
    }

    async fn put_site(&self, site: Site) -> FindableResult<()> {
        self.sites.insert(site.id.clone(), site);
        Ok(())
    }

    async fn get_run(&self, id: &str) -> FindableResult<Option<Run>> {
        Ok(self.runs.get(id).map(|r| r.value().clone()))
    }

    async fn put_run(&self, run: Run) -> FindableResult<()> {
        self.runs.insert(run.id.clone(), run);
        Ok(())
    }

    async fn put_calibration_config(&self, config: CalibrationConfig) -> FindableResult<()> {
        // Writer-enforced invariant, spec.md §6: sum(weights) == 100 +/- eps.
        if !config.is_valid() {
            return Err(findable_types::error::FindableError::input(format!(
                "calibration config {} fails validation (weights/thresholds/sub-weights)",
                config.id
            )));
        }
        if config.status == findable_types::calibration::CalibrationStatus::Active {
            // Exactly one active config at a time (spec.md §3 invariant):
            // demote any other currently-active config to draft.
            for mut entry in self.calibration_configs.iter_mut() {
                if entry.status == findable_types::calibration::CalibrationStatus::Active
                    && entry.id != config.id
                {
                    entry.status = findable_types::calibration::CalibrationStatus::Draft;
                }
            }
        }
        self.calibration_configs.insert(config.id.clone(), config);
        Ok(())
    }

    async fn get_active_calibration_config(
        &self,
        _arm: Option<ExperimentArm>,
    ) -> FindableResult<Option<CalibrationConfig>> {
        // Arm-specific config selection is resolved by the caller joining
        // against a `CalibrationExperiment`'s control/treatment config ids;
        // this store only tracks the single globally-active config, which
        // is what a run outside any experiment uses.
        Ok(self
            .calibration_configs
            .iter()
            .find(|entry| entry.status == findable_types::calibration::CalibrationStatus::Active)
            .map(|entry| entry.value().clone()))
    }

    async fn put_calibration_experiment(
        &self,
        experiment: CalibrationExperiment,
    ) -> FindableResult<()> {
        self.calibration_experiments
            .insert(experiment.id.clone(), experiment);
        Ok(())
    }

    async fn get_calibration_experiment(
        &self,
        id: &str,
    ) -> FindableResult<Option<CalibrationExperiment>> {
        Ok(self
            .calibration_experiments
            .get(id)
            .map(|r| r.value().clone()))
    }

    async fn append_calibration_sample(&self, sample: CalibrationSample) -> FindableResult<()> {
        let mut samples = self
            .calibration_samples
            .write()
            .expect("calibration sample log lock poisoned");
        samples.push(sample);
        Ok(())
    }

    async fn list_calibration_samples(
        &self,
        since_days: u32,
    ) -> FindableResult<Vec<CalibrationSample>> {
        let cutoff = chrono::Utc::now() - chrono::Duration::days(since_days as i64);
        let samples = self
            .calibration_samples
            .read()
            .expect("calibration sample log lock poisoned");
        Ok(samples
            .iter()
            .filter(|s| s.recorded_at >= cutoff)
            .cloned()
            .collect())
    }

    async fn put_drift_alert(&self, alert: DriftAlert) -> FindableResult<()> {
        self.drift_alerts.insert(alert.id.clone(), alert);
        Ok(())
    }

    async fn list_open_drift_alerts(&self) -> FindableResult<Vec<DriftAlert>> {
        Ok(self
            .drift_alerts
            .iter()
            .filter(|entry| entry.state != DriftAlertState::Resolved)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn upsert_embeddings(&self, embeddings: Vec<StoredEmbedding>) -> FindableResult<()> {
        for embedding in embeddings {
            self.embeddings.insert(
                (embedding.content_hash.clone(), embedding.site_id.clone()),
                embedding,
            );
        }
        Ok(())
    }

    async fn list_embeddings(&self, site_id: &str) -> FindableResult<Vec<StoredEmbedding>> {
        Ok(self
            .embeddings
            .iter()
            .filter(|entry| entry.key().1 == site_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn cache_crawl_result(&self, result: CrawlResult) -> FindableResult<()> {
        self.crawl_cache
            .insert(result.domain.to_lowercase(), result);
        Ok(())
    }

    async fn get_cached_crawl_result(&self, domain: &str) -> FindableResult<Option<CrawlResult>> {
        Ok(self
            .crawl_cache
            .get(&domain.to_lowercase())
            .map(|r| r.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use findable_types::calibration::CalibrationStatus;

    #[tokio::test]
    async fn site_round_trips() {
        let store = InMemoryStore::new();
        let site = Site {
            id: "s1".into(),
            domain: "example.com".into(),
            user_id: "u1".into(),
            business_model: None,
            name: Some("Example".into()),
        };
        store.put_site(site.clone()).await.unwrap();
        let fetched = store.get_site("s1").await.unwrap().unwrap();
        assert_eq!(fetched.domain, "example.com");
    }

    #[tokio::test]
    async fn invalid_calibration_config_rejected() {
        let store = InMemoryStore::new();
        let mut config = CalibrationConfig::default_active();
        config.pillar_weights.insert(findable_types::pillar::Pillar::Technical, 1.0);
        assert!(store.put_calibration_config(config).await.is_err());
    }

    #[tokio::test]
    async fn only_one_active_calibration_config_at_a_time() {
        let store = InMemoryStore::new();
        let mut first = CalibrationConfig::default_active();
        first.id = "a".into();
        store.put_calibration_config(first).await.unwrap();

        let mut second = CalibrationConfig::default_active();
        second.id = "b".into();
        store.put_calibration_config(second).await.unwrap();

        let a = store.calibration_configs.get("a").unwrap();
        let b = store.calibration_configs.get("b").unwrap();
        assert_eq!(a.status, CalibrationStatus::Draft);
        assert_eq!(b.status, CalibrationStatus::Active);
    }

    #[tokio::test]
    async fn calibration_samples_are_append_only_and_filtered_by_window() {
        let store = InMemoryStore::new();
        let old = CalibrationSample {
            id: "old".into(),
            question_id: "q1".into(),
            sim_answerability: findable_types::question::Answerability::Fully,
            sim_score: 0.9,
            sim_signals_found: 2,
            sim_signals_total: 2,
            obs_mentioned: true,
            obs_cited: true,
            outcome_match: findable_types::calibration::OutcomeMatch::TruePositive,
            prediction_accurate: true,
            question_category: findable_types::question::QuestionCategory::Identity,
            difficulty: findable_types::question::Difficulty::Easy,
            experiment_id: None,
            arm: None,
            recorded_at: chrono::Utc::now() - chrono::Duration::days(60),
        };
        let mut recent = old.clone();
        recent.id = "recent".into();
        recent.recorded_at = chrono::Utc::now();

        store.append_calibration_sample(old).await.unwrap();
        store.append_calibration_sample(recent).await.unwrap();

        let within_30 = store.list_calibration_samples(30).await.unwrap();
        assert_eq!(within_30.len(), 1);
        assert_eq!(within_30[0].id, "recent");
    }

    #[tokio::test]
    async fn embeddings_unique_on_content_hash_and_site() {
        let store = InMemoryStore::new();
        let emb = StoredEmbedding {
            id: "e1".into(),
            chunk_id: "c1".into(),
            page_id: "p1".into(),
            site_id: "site1".into(),
            content: "hello".into(),
            content_hash: "hash1".into(),
            embedding: vec![0.1f32, 0.2f32],
            model_name: "hashing-v1".into(),
            dimensions: 2,
            created_at: chrono::Utc::now(),
        };
        store.upsert_embeddings(vec![emb.clone()]).await.unwrap();
        let mut updated = emb.clone();
        updated.content = "hello again".into();
        store.upsert_embeddings(vec![updated]).await.unwrap();

        let listed = store.list_embeddings("site1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].content, "hello again");
    }

    #[tokio::test]
    async fn crawl_cache_keyed_by_lowercased_domain() {
        let store = InMemoryStore::new();
        let now = chrono::Utc::now();
        let result = CrawlResult {
            domain: "Example.com".into(),
            start_url: "https://example.com/".into(),
            pages: vec![],
            urls_discovered: 0,
            urls_crawled: 0,
            urls_skipped: 0,
            urls_failed: 0,
            started_at: now,
            completed_at: now,
            duration_seconds: 0.0,
            robots_respected: true,
            max_depth_reached: 0,
            docs_pages_crawled: 0,
            marketing_pages_crawled: 0,
            docs_surface_detected: false,
        };
        store.cache_crawl_result(result).await.unwrap();
        let cached = store
            .get_cached_crawl_result("example.com")
            .await
            .unwrap();
        assert!(cached.is_some());
    }
}
