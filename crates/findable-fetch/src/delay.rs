//! Per-host politeness gate: at most one request per effective delay,
//! where the effective delay is `max(configured min-delay, robots
//! Crawl-delay)`.

use dashmap::DashMap;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

type HostLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

pub struct HostDelayGate {
    min_delay: Duration,
    limiters: DashMap<String, Arc<HostLimiter>>,
}

impl HostDelayGate {
    pub fn new(min_delay: Duration) -> Self {
        Self {
            min_delay,
            limiters: DashMap::new(),
        }
    }

    /// Block until this host's next request slot opens, creating the
    /// host's limiter on first use from `robots_crawl_delay` (if any) and
    /// the configured minimum.
    pub async fn wait_turn(&self, host: &str, robots_crawl_delay: Option<f64>) {
        let limiter = self.limiter_for(host, robots_crawl_delay);
        limiter.until_ready().await;
    }

    fn limiter_for(&self, host: &str, robots_crawl_delay: Option<f64>) -> Arc<HostLimiter> {
        if let Some(existing) = self.limiters.get(host) {
            return existing.clone();
        }
        let delay = robots_crawl_delay
            .map(Duration::from_secs_f64)
            .filter(|d| *d > Duration::ZERO)
            .map(|d| d.max(self.min_delay))
            .unwrap_or(self.min_delay)
            .max(Duration::from_millis(1));
        let quota = Quota::with_period(delay).unwrap_or_else(|| {
            Quota::per_second(NonZeroU32::new(1).expect("1 is nonzero"))
        });
        let limiter = Arc::new(RateLimiter::direct(quota));
        self.limiters
            .entry(host.to_string())
            .or_insert(limiter)
            .clone()
    }
}
