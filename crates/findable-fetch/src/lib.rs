//! # Findable Fetch
//!
//! Polite HTTP fetching for the audit crawl: a per-host delay gate (the
//! greater of a configured minimum and the target's robots crawl-delay), a
//! per-host circuit breaker, and transport-failure classification.

pub mod circuit;
pub mod client;
pub mod delay;
pub mod error;

pub use circuit::{CircuitBreaker, CircuitConfig, State as CircuitState};
pub use client::{FetchConfig, FetchOutcome, PoliteFetcher};
pub use delay::HostDelayGate;
pub use error::FetchError;

#[cfg(test)]
mod integration_tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_html_and_reports_timing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<html><body>hi</body></html>")
                    .insert_header("content-type", "text/html"),
            )
            .mount(&server)
            .await;

        let fetcher = PoliteFetcher::new(FetchConfig {
            min_delay: std::time::Duration::from_millis(1),
            ..FetchConfig::default()
        })
        .unwrap();

        let outcome = fetcher.fetch(&server.uri(), None).await.unwrap();
        assert_eq!(outcome.status, 200);
        assert!(outcome.body.contains("hi"));
    }

    #[tokio::test]
    async fn rejects_non_html_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("{}")
                    .insert_header("content-type", "application/json"),
            )
            .mount(&server)
            .await;

        let fetcher = PoliteFetcher::new(FetchConfig {
            min_delay: std::time::Duration::from_millis(1),
            max_attempts: 1,
            ..FetchConfig::default()
        })
        .unwrap();

        let url = format!("{}/data.json", server.uri());
        let err = fetcher.fetch(&url, None).await.unwrap_err();
        assert!(matches!(err, FetchError::ContentTypeRejected { .. }));
    }

    #[tokio::test]
    async fn http_errors_trip_the_circuit_breaker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = PoliteFetcher::new(FetchConfig {
            min_delay: std::time::Duration::from_millis(1),
            max_attempts: 1,
            circuit: CircuitConfig {
                failure_threshold: 1,
                cooldown: std::time::Duration::from_secs(60),
                half_open_max_in_flight: 1,
            },
            ..FetchConfig::default()
        })
        .unwrap();

        let url = format!("{}/down", server.uri());
        assert!(fetcher.fetch(&url, None).await.is_err());
        let err = fetcher.fetch(&url, None).await.unwrap_err();
        assert!(matches!(err, FetchError::CircuitOpen { .. }));
    }
}
