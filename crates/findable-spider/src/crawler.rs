//! BFS crawl orchestration: frontier seeding (start URL, priority paths,
//! sitemap URLs), robots-gated bounded-concurrency fetch batches, and
//! surface classification of the resulting pages.

use crate::extractor::extract_links;
use crate::frontier::Frontier;
use chrono::Utc;
use findable_fetch::PoliteFetcher;
use findable_types::config::CrawlConfig;
use findable_types::crawl::{classify_surface, CrawlPage, CrawlResult};
use findable_url::{RobotsParser, SitemapParser};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use url::Url;

pub struct Spider {
    fetcher: Arc<PoliteFetcher>,
    config: CrawlConfig,
}

impl Spider {
    pub fn new(fetcher: Arc<PoliteFetcher>, config: CrawlConfig) -> Self {
        Self { fetcher, config }
    }

    pub async fn crawl(&self, start_url: &str) -> anyhow::Result<CrawlResult> {
        let started_at = Utc::now();
        let wall_start = Instant::now();

        let normalized_start = findable_url::normalize(start_url, None)
            .ok_or_else(|| anyhow::anyhow!("start url does not normalize: {start_url}"))?;
        let domain = findable_url::extract_domain(&normalized_start)
            .ok_or_else(|| anyhow::anyhow!("start url has no host: {start_url}"))?;
        let origin = format!("https://{domain}");

        let robots = if self.config.respect_robots {
            self.fetch_robots(&domain).await
        } else {
            RobotsParser::default()
        };

        let mut frontier = Frontier::new(&normalized_start, self.config.max_depth);
        frontier.seed_priority_paths(&origin, &self.config.priority_paths);

        let sitemap_urls = self.discover_sitemap_urls(&robots, &origin).await;
        frontier.seed_sitemap_urls(&sitemap_urls);

        let mut pages = Vec::new();
        let mut urls_failed = 0usize;
        let mut urls_skipped = 0usize;
        let mut max_depth_reached = 0u32;

        while !frontier.is_empty() && pages.len() < self.config.max_pages {
            let mut batch = Vec::new();
            while batch.len() < self.config.concurrency {
                let Some(entry) = frontier.dequeue() else { break };
                batch.push(entry);
                if pages.len() + batch.len() >= self.config.max_pages {
                    break;
                }
            }
            if batch.is_empty() {
                break;
            }

            let fetches = batch.into_iter().map(|entry| {
                let fetcher = self.fetcher.clone();
                let robots = robots.clone();
                let respect_robots = self.config.respect_robots;
                async move {
                    let robots_arg = if respect_robots { Some(&robots) } else { None };
                    let result = fetcher.fetch(&entry.url, robots_arg).await;
                    (entry, result)
                }
            });
            let results = futures::future::join_all(fetches).await;

            for (entry, result) in results {
                match result {
                    Ok(outcome) => {
                        let extraction = extract_links(
                            &outcome.body,
                            &outcome.final_url,
                            &domain,
                            self.config.follow_external_links,
                        );
                        let host = Url::parse(&outcome.final_url)
                            .ok()
                            .and_then(|u| u.host_str().map(str::to_string))
                            .unwrap_or_else(|| domain.clone());
                        let path = Url::parse(&outcome.final_url)
                            .map(|u| u.path().to_string())
                            .unwrap_or_default();
                        let surface = classify_surface(&host, &path);

                        max_depth_reached = max_depth_reached.max(entry.depth);
                        pages.push(CrawlPage {
                            url: entry.url.clone(),
                            final_url: outcome.final_url,
                            title: extraction.title,
                            html: outcome.body,
                            content_type: Some(outcome.content_type),
                            status_code: outcome.status,
                            depth: entry.depth,
                            fetch_time_ms: outcome.total_time.as_millis() as u64,
                            fetched_at: Utc::now(),
                            links_found: extraction.links.len(),
                            surface,
                        });

                        for link in extraction.links {
                            frontier.enqueue(link, entry.depth + 1);
                        }
                    }
                    Err(err) if err.is_policy_skip() => {
                        urls_skipped += 1;
                        warn!(url = %entry.url, error = %err, "skipped by policy");
                    }
                    Err(err) => {
                        urls_failed += 1;
                        warn!(url = %entry.url, error = %err, "fetch failed");
                    }
                }
            }
        }

        let completed_at = Utc::now();
        let docs_pages_crawled = pages
            .iter()
            .filter(|p| matches!(p.surface, findable_types::crawl::Surface::Docs))
            .count();
        let marketing_pages_crawled = pages.len() - docs_pages_crawled;

        info!(
            domain,
            pages = pages.len(),
            failed = urls_failed,
            skipped = urls_skipped,
            "crawl complete"
        );

        Ok(CrawlResult {
            domain,
            start_url: normalized_start,
            urls_discovered: frontier.seen_count(),
            urls_crawled: pages.len(),
            urls_skipped,
            urls_failed,
            started_at,
            completed_at,
            duration_seconds: wall_start.elapsed().as_secs_f64(),
            robots_respected: self.config.respect_robots,
            max_depth_reached,
            docs_pages_crawled,
            marketing_pages_crawled,
            docs_surface_detected: docs_pages_crawled > 0,
            pages,
        })
    }

    async fn fetch_robots(&self, domain: &str) -> RobotsParser {
        let robots_url = format!("https://{domain}/robots.txt");
        match self.fetcher.fetch(&robots_url, None).await {
            Ok(outcome) if outcome.status < 400 => {
                RobotsParser::parse(&outcome.body, &self.config.user_agent)
            }
            _ => RobotsParser::default(),
        }
    }

    async fn discover_sitemap_urls(&self, robots: &RobotsParser, origin: &str) -> Vec<String> {
        let mut candidates = robots.sitemaps.clone();
        if candidates.is_empty() {
            candidates.push(format!("{origin}/sitemap.xml"));
        }

        let parser = SitemapParser::default();
        let mut urls = Vec::new();
        for sitemap_url in candidates.into_iter().take(parser.max_sitemaps) {
            let Ok(outcome) = self.fetcher.fetch(&sitemap_url, None).await else {
                continue;
            };
            if outcome.status >= 400 {
                continue;
            }
            let bytes = SitemapParser::maybe_decompress(outcome.body.as_bytes(), &sitemap_url);
            let Ok(parsed) = parser.parse(&bytes) else {
                continue;
            };
            if parsed.is_index {
                for nested in parsed.nested_sitemaps {
                    if let Ok(nested_outcome) = self.fetcher.fetch(&nested, None).await {
                        if nested_outcome.status < 400 {
                            let nested_bytes = SitemapParser::maybe_decompress(
                                nested_outcome.body.as_bytes(),
                                &nested,
                            );
                            if let Ok(nested_parsed) = parser.parse(&nested_bytes) {
                                urls.extend(nested_parsed.entries.into_iter().map(|e| e.loc));
                            }
                        }
                    }
                }
            } else {
                urls.extend(parsed.entries.into_iter().map(|e| e.loc));
            }
        }
        urls
    }
}
