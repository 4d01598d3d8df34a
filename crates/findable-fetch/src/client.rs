use crate::circuit::{CircuitBreaker, CircuitConfig};
use crate::delay::HostDelayGate;
use crate::error::FetchError;
use dashmap::DashMap;
use findable_url::RobotsParser;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub min_delay: Duration,
    pub connect_timeout: Duration,
    pub total_timeout: Duration,
    pub max_redirects: u32,
    pub max_attempts: u32,
    pub circuit: CircuitConfig,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "FindableBot/1.0 (+https://findable.example/bot)".to_string(),
            min_delay: Duration::from_millis(500),
            connect_timeout: Duration::from_secs(5),
            total_timeout: Duration::from_secs(20),
            max_redirects: 5,
            max_attempts: 3,
            circuit: CircuitConfig::default(),
        }
    }
}

/// Outcome of a single successful fetch.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub final_url: String,
    pub status: u16,
    pub content_type: String,
    pub body: String,
    pub ttfb: Duration,
    pub total_time: Duration,
    pub redirect_count: u32,
}

/// Polite, circuit-broken HTTP fetcher. One gate and one breaker per host,
/// shared across every call through interior `DashMap`s.
pub struct PoliteFetcher {
    client: Client,
    config: FetchConfig,
    gates: HostDelayGate,
    breakers: DashMap<String, Arc<CircuitBreaker>>,
}

impl PoliteFetcher {
    pub fn new(config: FetchConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .brotli(true)
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects as usize))
            .build()?;
        Ok(Self {
            client,
            gates: HostDelayGate::new(config.min_delay),
            config,
            breakers: DashMap::new(),
        })
    }

    fn breaker_for(&self, host: &str) -> Arc<CircuitBreaker> {
        self.breakers
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(CircuitBreaker::new(self.config.circuit)))
            .clone()
    }

    /// Fetch `url`, honoring `robots` (if given) for both allow/deny and
    /// crawl-delay. Retries transient failures with exponential backoff
    /// and jitter, respecting the per-host circuit breaker throughout.
    pub async fn fetch(
        &self,
        url: &str,
        robots: Option<&RobotsParser>,
    ) -> Result<FetchOutcome, FetchError> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let host = parsed.host_str().unwrap_or_default().to_string();

        if let Some(robots) = robots {
            if !robots.is_allowed(parsed.path()) {
                return Err(FetchError::RobotsDisallowed {
                    url: url.to_string(),
                });
            }
        }

        let breaker = self.breaker_for(&host);
        if !breaker.try_acquire() {
            return Err(FetchError::CircuitOpen {
                host,
                url: url.to_string(),
            });
        }

        self.gates
            .wait_turn(&host, robots.and_then(|r| r.crawl_delay))
            .await;

        let mut last_err = None;
        for attempt in 0..self.config.max_attempts {
            match self.fetch_once(url).await {
                Ok(outcome) => {
                    breaker.record_success();
                    return Ok(outcome);
                }
                Err(err) => {
                    if err.is_policy_skip() {
                        return Err(err);
                    }
                    warn!(url, attempt, error = %err, "fetch attempt failed");
                    last_err = Some(err);
                    if attempt + 1 < self.config.max_attempts {
                        tokio::time::sleep(backoff_delay(attempt)).await;
                    }
                }
            }
        }

        breaker.record_failure();
        Err(last_err.unwrap_or(FetchError::Connection {
            url: url.to_string(),
            message: "exhausted retries".to_string(),
        }))
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport_error(url, &e))?;
        let ttfb = start.elapsed();

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let redirect_count = 0; // reqwest doesn't expose the hop count directly.
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if status >= 400 {
            return Err(FetchError::HttpStatus { url: url.to_string(), status });
        }
        if !content_type.is_empty() && !content_type.contains("html") && !content_type.contains("xml") {
            return Err(FetchError::ContentTypeRejected {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_transport_error(url, &e))?;
        let total_time = start.elapsed();

        debug!(url, status, ttfb_ms = ttfb.as_millis() as u64, "fetched");

        Ok(FetchOutcome {
            final_url,
            status,
            content_type,
            body,
            ttfb,
            total_time,
            redirect_count,
        })
    }
}

fn classify_transport_error(url: &str, err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
            elapsed_ms: 0,
        }
    } else {
        FetchError::Connection {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let base_ms = 200u64 * 2u64.pow(attempt);
    let jitter_ms = rand::random::<u64>() % 100;
    Duration::from_millis(base_ms + jitter_ms).min(Duration::from_secs(10))
}
