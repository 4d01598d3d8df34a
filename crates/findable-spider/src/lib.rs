//! # Findable Spider
//!
//! C3 of the audit pipeline: a bounded-depth, bounded-concurrency BFS
//! crawler. Seeds the frontier with the start URL, configured priority
//! paths and sitemap-discovered URLs (in that order), respects robots.txt
//! and per-host politeness delay through `findable-fetch`, and classifies
//! each page's surface (docs vs marketing) as it lands.

pub mod config;
pub mod crawler;
pub mod extractor;
pub mod frontier;

pub use config::CrawlConfig;
pub use crawler::Spider;
pub use extractor::{extract_links, LinkExtraction};
pub use frontier::{Frontier, FrontierEntry};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use findable_fetch::{FetchConfig, PoliteFetcher};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn crawls_linked_pages_within_depth() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<html><body><a href="/about">About</a></body></html>"#)
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/about"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>About us</body></html>")
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = Arc::new(
            PoliteFetcher::new(FetchConfig {
                min_delay: Duration::from_millis(1),
                ..FetchConfig::default()
            })
            .unwrap(),
        );
        let config = CrawlConfig {
            max_pages: 10,
            max_depth: 2,
            respect_robots: false,
            priority_paths: vec![],
            concurrency: 2,
            ..CrawlConfig::default()
        };
        let spider = Spider::new(fetcher, config);

        let result = spider.crawl(&server.uri()).await.unwrap();
        assert!(result.respects_limits(10, 2));
        assert_eq!(result.urls_crawled, 2);
        assert!(result.pages.iter().any(|p| p.url.ends_with("/about")));
    }
}
