//! Run orchestration: the single place that knows the order C1-C16 run in.
//!
//! `crawl -> extract -> analyze -> index -> simulate -> score`, with a
//! `RunEvent` published at every phase boundary and the final `Run`/score
//! written through `PersistenceStore`. Every phase's actual work lives in
//! its own crate; this module only sequences them and reshapes page-level
//! output into the site-level shape the six pillar scorers expect.

use crate::aggregate::{apply_site_mean, closest_to_mean};
use crate::config::AuditConfig;
use crate::site_context::build_site_context;
use findable_analyzers::{analyze_page, analyze_robots_ai, analyze_topic_clusters, check_llms_txt, PageInput};
use findable_events::{EventBus, RunEvent};
use findable_extraction::ContentExtractor;
use findable_fetch::{FetchConfig, PoliteFetcher};
use findable_retrieval::{chunk_page, content_hash, ChunkerConfig, Embedder, IndexedChunk, RetrievalIndex};
use findable_scoring::{compose_score, score_authority, score_coverage, score_retrieval, score_schema, score_structure, score_technical, TechnicalInputs};
use findable_simulation::{generate_questions, run_simulation};
use findable_spider::{extract_links, Spider};
use findable_types::calibration::CalibrationConfig;
use findable_types::crawl::CrawlResult;
use findable_types::error::{FindableError, FindableResult};
use findable_types::pillar::{Pillar, PillarScore};
use findable_types::ports::PersistenceStore;
use findable_types::question::SimulationResult;
use findable_types::run::{Run, RunPhase, RunStatus};
use findable_types::score::FindableScore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// Everything a finished run produced, independent of whether it was served
/// from cache or freshly crawled.
pub struct RunOutcome {
    pub run: Run,
    pub crawl: CrawlResult,
    pub score: FindableScore,
}

fn weight_for(calibration: &CalibrationConfig, pillar: Pillar) -> f64 {
    calibration
        .pillar_weights
        .get(&pillar)
        .copied()
        .unwrap_or_else(|| CalibrationConfig::default_weights().get(&pillar).copied().unwrap_or(0.0))
}

fn publish_and_log(events: &EventBus, event: RunEvent) {
    events.publish(event);
}

/// Runs one full audit of `start_url` under `config`, publishing lifecycle
/// events through `events` and writing the finished `Run` through `store`.
///
/// On a fatal error (`FindableError::is_fatal_to_run`) the run is marked
/// `Failed` and persisted before the error is returned; non-fatal gaps (no
/// pages extracted, simulation skipped) instead surface as a partial score.
pub async fn run_audit(
    site_id: &str,
    start_url: &str,
    config: &AuditConfig,
    store: &dyn PersistenceStore,
    events: &EventBus,
) -> FindableResult<RunOutcome> {
    let run_id = Uuid::new_v4().to_string();
    let started_at = chrono::Utc::now();

    let run_config = serde_json::to_value(config).unwrap_or(serde_json::Value::Null);
    let mut run = Run {
        id: run_id.clone(),
        site_id: site_id.to_string(),
        run_type: "audit".to_string(),
        status: RunStatus::InProgress(RunPhase::Crawl),
        config: run_config,
        created_at: started_at,
        started_at: Some(started_at),
        completed_at: None,
    };
    store.put_run(run.clone()).await?;

    match run_audit_inner(&run_id, start_url, config, store, events).await {
        Ok((crawl, score)) => {
            run.status = if score.is_partial { RunStatus::CompletedPartial } else { RunStatus::Completed };
            run.completed_at = Some(chrono::Utc::now());
            store.put_run(run.clone()).await?;
            publish_and_log(
                events,
                RunEvent::RunCompleted {
                    run_id: run_id.clone(),
                    partial: score.is_partial,
                    at: chrono::Utc::now(),
                },
            );
            Ok(RunOutcome { run, crawl, score })
        }
        Err(err) => {
            run.status = RunStatus::Failed;
            run.completed_at = Some(chrono::Utc::now());
            // best-effort: a persistence failure here doesn't shadow the
            // original error, which is what the caller actually needs to see.
            let _ = store.put_run(run.clone()).await;
            publish_and_log(
                events,
                RunEvent::RunFailed {
                    run_id: run_id.clone(),
                    message: err.to_string(),
                    at: chrono::Utc::now(),
                },
            );
            Err(err)
        }
    }
}

async fn run_audit_inner(
    run_id: &str,
    start_url: &str,
    config: &AuditConfig,
    store: &dyn PersistenceStore,
    events: &EventBus,
) -> FindableResult<(CrawlResult, FindableScore)> {
    let normalized_start =
        findable_url::normalize(start_url, None).ok_or_else(|| FindableError::input(format!("start url does not normalize: {start_url}")))?;
    let domain = findable_url::extract_domain(&normalized_start)
        .ok_or_else(|| FindableError::input(format!("start url has no host: {start_url}")))?;
    let is_https = normalized_start.starts_with("https://");

    let fetcher = Arc::new(
        PoliteFetcher::new(FetchConfig {
            user_agent: config.crawl.user_agent.clone(),
            min_delay: config.crawl.min_delay,
            ..FetchConfig::default()
        })
        .map_err(|e| FindableError::input(format!("could not build fetcher: {e}")))?,
    );

    // --- Crawl -------------------------------------------------------
    publish_and_log(
        events,
        RunEvent::PhaseStarted { run_id: run_id.to_string(), phase: RunPhase::Crawl, at: chrono::Utc::now() },
    );

    let crawl = crawl_or_cached(&domain, &normalized_start, config, store, fetcher.clone()).await?;

    publish_and_log(
        events,
        RunEvent::PhaseCompleted { run_id: run_id.to_string(), phase: RunPhase::Crawl, at: chrono::Utc::now() },
    );

    // --- Extract -------------------------------------------------------
    publish_and_log(
        events,
        RunEvent::PhaseStarted { run_id: run_id.to_string(), phase: RunPhase::Extract, at: chrono::Utc::now() },
    );

    let extractor = ContentExtractor::default();
    let extraction = extractor.extract_crawl(&domain, &crawl.pages);
    if extraction.pages.is_empty() {
        warn!(domain, "no pages extracted; score will be heavily partial");
    }

    publish_and_log(
        events,
        RunEvent::PhaseCompleted { run_id: run_id.to_string(), phase: RunPhase::Extract, at: chrono::Utc::now() },
    );

    // --- Analyze -------------------------------------------------------
    publish_and_log(
        events,
        RunEvent::PhaseStarted { run_id: run_id.to_string(), phase: RunPhase::Analyze, at: chrono::Utc::now() },
    );

    let robots_txt = fetcher
        .fetch(&format!("https://{domain}/robots.txt"), None)
        .await
        .map(|o| o.body)
        .unwrap_or_default();
    let robots_analysis = analyze_robots_ai(&robots_txt);
    let llms_txt_result = check_llms_txt(&fetcher, &normalized_start).await;

    let page_analyses: Vec<_> = extraction
        .pages
        .iter()
        .filter_map(|page| {
            let crawl_page = crawl.pages.iter().find(|p| p.url == page.url)?;
            let ttfb = Duration::from_millis(crawl_page.fetch_time_ms);
            Some(analyze_page(
                &page.url,
                &crawl_page.html,
                &page.metadata.schema_types,
                page.metadata.published_date.as_deref(),
                page.metadata.modified_date.as_deref(),
                ttfb,
            ))
        })
        .collect();

    let topic_inputs: Vec<PageInput> = extraction
        .pages
        .iter()
        .map(|page| {
            let internal_links = crawl
                .pages
                .iter()
                .find(|p| p.url == page.url)
                .map(|p| extract_links(&p.html, &p.url, &domain, false).links)
                .unwrap_or_default();
            PageInput {
                url: page.url.clone(),
                word_count: page.word_count,
                title: page.title.clone().unwrap_or_default(),
                internal_links,
            }
        })
        .collect();
    let topic_analysis = analyze_topic_clusters(&topic_inputs);

    publish_and_log(
        events,
        RunEvent::PhaseCompleted { run_id: run_id.to_string(), phase: RunPhase::Analyze, at: chrono::Utc::now() },
    );

    // --- Index -------------------------------------------------------
    publish_and_log(
        events,
        RunEvent::PhaseStarted { run_id: run_id.to_string(), phase: RunPhase::Index, at: chrono::Utc::now() },
    );

    let embedder = Embedder::default();
    let mut index = RetrievalIndex::new(run_id, embedder.clone());
    let mut indexed_chunks = Vec::new();
    for page in &extraction.pages {
        let Some(crawl_page) = crawl.pages.iter().find(|p| p.url == page.url) else { continue };
        let chunks = chunk_page(&page.url, &crawl_page.html, ChunkerConfig::default());
        for chunk in chunks {
            let embedding = embedder.embed(&chunk.content);
            let entry = IndexedChunk {
                embedding_id: Uuid::new_v4().to_string(),
                chunk_id: chunk.chunk_id,
                page_id: page.url.clone(),
                site_id: run_id.to_string(),
                content_hash: content_hash(&chunk.content),
                content: chunk.content,
                embedding,
                heading_context: chunk.heading_context,
                position_ratio: chunk.position_ratio,
                source_url: page.url.clone(),
                page_title: page.title.clone(),
            };
            indexed_chunks.push(entry.clone());
            index.upsert(entry);
        }
    }

    if !indexed_chunks.is_empty() {
        let embeddings = indexed_chunks
            .into_iter()
            .map(|e| e.into_stored_embedding(embedder.model_name()))
            .collect();
        store.upsert_embeddings(embeddings).await?;
    }

    publish_and_log(
        events,
        RunEvent::PhaseCompleted { run_id: run_id.to_string(), phase: RunPhase::Index, at: chrono::Utc::now() },
    );

    // --- Simulate -------------------------------------------------------
    publish_and_log(
        events,
        RunEvent::PhaseStarted { run_id: run_id.to_string(), phase: RunPhase::Simulate, at: chrono::Utc::now() },
    );

    let simulation: Option<SimulationResult> = if config.pipeline.run_simulation {
        let homepage = extraction.pages.iter().find(|p| p.url == normalized_start || p.url == crawl.start_url);
        let ctx = build_site_context(&domain, homepage, &extraction.pages);
        let questions = generate_questions(&ctx);
        Some(run_simulation(&questions, &index, &config.calibration, None).await)
    } else {
        None
    };

    publish_and_log(
        events,
        RunEvent::PhaseCompleted { run_id: run_id.to_string(), phase: RunPhase::Simulate, at: chrono::Utc::now() },
    );

    // --- Score -------------------------------------------------------
    publish_and_log(
        events,
        RunEvent::PhaseStarted { run_id: run_id.to_string(), phase: RunPhase::Score, at: chrono::Utc::now() },
    );

    let mut pillars = Vec::new();
    let mut critical_issues = Vec::new();
    let mut fixes = Vec::new();

    pillars.push(score_technical_site(&page_analyses, &robots_analysis, &llms_txt_result, is_https, config, &mut critical_issues));
    pillars.push(score_structure_site(&page_analyses, config));
    pillars.push(score_schema_site(&page_analyses, config));
    pillars.push(score_authority_site(&page_analyses, config));

    let retrieval_weight = weight_for(&config.calibration, Pillar::Retrieval);
    pillars.push(match &simulation {
        Some(sim) => score_retrieval(sim, retrieval_weight).pillar,
        None => PillarScore::not_evaluated(Pillar::Retrieval, retrieval_weight, "Simulation was skipped for this run"),
    });

    let crawl_completeness = if crawl.urls_discovered == 0 { 1.0 } else { (crawl.urls_crawled as f64 / crawl.urls_discovered as f64).min(1.0) };
    let coverage_weight = weight_for(&config.calibration, Pillar::Coverage);
    // §4.10's defined Coverage input: the fraction of simulated questions
    // that retrieved at least one chunk above the relevance floor.
    let retrieval_coverage_score = simulation.as_ref().map(|sim| sim.coverage_score);
    let coverage_result = score_coverage(&topic_analysis, crawl_completeness, retrieval_coverage_score, coverage_weight);
    fixes.extend(topic_analysis.recommendations.iter().take(3).cloned());
    pillars.push(coverage_result.pillar);

    let score = compose_score(pillars, critical_issues, fixes);

    publish_and_log(
        events,
        RunEvent::PhaseCompleted { run_id: run_id.to_string(), phase: RunPhase::Score, at: chrono::Utc::now() },
    );

    Ok((crawl, score))
}

/// Consults the crawl cache (unless `force_refresh`), else crawls fresh and
/// caches the result. `use_cache = false` always crawls fresh without even
/// consulting the cache, but still writes the result back for next time.
async fn crawl_or_cached(
    domain: &str,
    start_url: &str,
    config: &AuditConfig,
    store: &dyn PersistenceStore,
    fetcher: Arc<PoliteFetcher>,
) -> FindableResult<CrawlResult> {
    if config.use_cache && !config.force_refresh {
        if let Some(cached) = store.get_cached_crawl_result(domain).await? {
            let age = chrono::Utc::now().signed_duration_since(cached.completed_at);
            let ttl = chrono::Duration::hours(config.pipeline.cache_ttl_hours as i64);
            if age < ttl {
                info!(domain, age_secs = age.num_seconds(), "serving crawl from cache");
                return Ok(cached);
            }
        }
    }

    let spider = Spider::new(fetcher, config.crawl.clone());
    let crawl = spider
        .crawl(start_url)
        .await
        .map_err(|e| FindableError::network(start_url, e.to_string()))?;
    store.cache_crawl_result(crawl.clone()).await?;
    Ok(crawl)
}

fn score_technical_site(
    page_analyses: &[findable_analyzers::PageAnalysis],
    robots: &findable_analyzers::RobotsAiAnalysis,
    llms_txt: &findable_analyzers::LlmsTxtResult,
    is_https: bool,
    config: &AuditConfig,
    critical_issues: &mut Vec<String>,
) -> PillarScore {
    let weight = weight_for(&config.calibration, Pillar::Technical);
    if !config.pipeline.run_technical || page_analyses.is_empty() {
        return PillarScore::not_evaluated(Pillar::Technical, weight, "Technical analysis was skipped or no pages were extracted");
    }

    // TTFB: the page whose own TTFB score is closest to the site average,
    // so one unusually slow or fast outlier doesn't stand in for the site.
    let ttfb_scores: Vec<f64> = page_analyses.iter().map(|p| p.ttfb.score).collect();
    let ttfb_idx = closest_to_mean(&ttfb_scores);

    // JS accessibility: the single worst page, since one JS-shell page among
    // many server-rendered ones is still a real AI-visibility gap, and
    // averaging it away would hide exactly the failure this component exists
    // to catch.
    let js_idx = page_analyses
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.js_detection.score.partial_cmp(&b.js_detection.score).unwrap())
        .map(|(i, _)| i)
        .unwrap_or(0);

    let inputs = TechnicalInputs {
        robots: Some(robots),
        ttfb: Some(&page_analyses[ttfb_idx].ttfb),
        llms_txt: Some(llms_txt),
        js: Some(&page_analyses[js_idx].js_detection),
        is_https,
        pillar_weight: weight,
    };
    let result = score_technical(&inputs);
    critical_issues.extend(result.critical_issues.iter().map(|i| i.message.clone()));

    // Index `page_analyses` directly (not `extraction.pages`, which can be a
    // different length when a page's crawl record isn't found) so the
    // reported representative URL always matches the page `js_idx` picked.
    apply_site_mean(result.pillar, result.pillar.raw_score, page_analyses.len(), &page_analyses[js_idx].url)
}

fn score_structure_site(page_analyses: &[findable_analyzers::PageAnalysis], config: &AuditConfig) -> PillarScore {
    let weight = weight_for(&config.calibration, Pillar::Structure);
    if !config.pipeline.run_structure || page_analyses.is_empty() {
        return PillarScore::not_evaluated(Pillar::Structure, weight, "Structure analysis was skipped or no pages were extracted");
    }
    let scores: Vec<f64> = page_analyses.iter().map(|p| p.structure.score).collect();
    let idx = closest_to_mean(&scores);
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let result = score_structure(&page_analyses[idx].structure, weight);
    apply_site_mean(result.pillar, mean, page_analyses.len(), &page_analyses[idx].url)
}

fn score_schema_site(page_analyses: &[findable_analyzers::PageAnalysis], config: &AuditConfig) -> PillarScore {
    let weight = weight_for(&config.calibration, Pillar::Schema);
    if !config.pipeline.run_schema || page_analyses.is_empty() {
        return PillarScore::not_evaluated(Pillar::Schema, weight, "Schema analysis was skipped or no pages were extracted");
    }
    let scores: Vec<f64> = page_analyses.iter().map(|p| p.schema.score).collect();
    let idx = closest_to_mean(&scores);
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let result = score_schema(&page_analyses[idx].schema, weight);
    apply_site_mean(result.pillar, mean, page_analyses.len(), &page_analyses[idx].url)
}

fn score_authority_site(page_analyses: &[findable_analyzers::PageAnalysis], config: &AuditConfig) -> PillarScore {
    let weight = weight_for(&config.calibration, Pillar::Authority);
    if !config.pipeline.run_authority || page_analyses.is_empty() {
        return PillarScore::not_evaluated(Pillar::Authority, weight, "Authority analysis was skipped or no pages were extracted");
    }
    let scores: Vec<f64> = page_analyses.iter().map(|p| p.authority.score).collect();
    let idx = closest_to_mean(&scores);
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let result = score_authority(&page_analyses[idx].authority, weight);
    apply_site_mean(result.pillar, mean, page_analyses.len(), &page_analyses[idx].url)
}
