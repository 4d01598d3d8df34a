//! Per-host circuit breaker. Trips after repeated fetch failures against
//! the same host so a single misbehaving origin can't stall the rest of a
//! crawl; half-opens after a cooldown to probe recovery.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy)]
pub struct CircuitConfig {
    pub failure_threshold: u32,
    pub cooldown: Duration,
    pub half_open_max_in_flight: u32,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            cooldown: Duration::from_secs(30),
            half_open_max_in_flight: 1,
        }
    }
}

/// One breaker per host. `opened_at_millis` stores an epoch-relative
/// instant via `Instant::elapsed`-free bookkeeping so the struct stays
/// `Sync` without a mutex.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitConfig,
    consecutive_failures: AtomicU32,
    opened_at: std::sync::Mutex<Option<Instant>>,
    half_open_in_flight: AtomicU64,
}

impl CircuitBreaker {
    pub fn new(config: CircuitConfig) -> Self {
        Self {
            config,
            consecutive_failures: AtomicU32::new(0),
            opened_at: std::sync::Mutex::new(None),
            half_open_in_flight: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> State {
        let opened_at = *self.opened_at.lock().unwrap();
        match opened_at {
            None => State::Closed,
            Some(at) if at.elapsed() >= self.config.cooldown => State::HalfOpen,
            Some(_) => State::Open,
        }
    }

    /// Returns `true` if a request may proceed right now, reserving a
    /// half-open slot if applicable.
    pub fn try_acquire(&self) -> bool {
        match self.state() {
            State::Closed => true,
            State::Open => false,
            State::HalfOpen => {
                let in_flight = self.half_open_in_flight.fetch_add(1, Ordering::SeqCst);
                if in_flight < self.config.half_open_max_in_flight as u64 {
                    true
                } else {
                    self.half_open_in_flight.fetch_sub(1, Ordering::SeqCst);
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        self.consecutive_failures.store(0, Ordering::SeqCst);
        *self.opened_at.lock().unwrap() = None;
        self.half_open_in_flight.store(0, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
        if failures >= self.config.failure_threshold {
            let mut opened_at = self.opened_at.lock().unwrap();
            if opened_at.is_none() {
                *opened_at = Some(Instant::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trips_after_threshold_failures() {
        let breaker = CircuitBreaker::new(CircuitConfig {
            failure_threshold: 2,
            cooldown: Duration::from_secs(60),
            half_open_max_in_flight: 1,
        });
        assert_eq!(breaker.state(), State::Closed);
        breaker.record_failure();
        assert_eq!(breaker.state(), State::Closed);
        breaker.record_failure();
        assert_eq!(breaker.state(), State::Open);
        assert!(!breaker.try_acquire());
    }

    #[test]
    fn success_resets_breaker() {
        let breaker = CircuitBreaker::new(CircuitConfig {
            failure_threshold: 1,
            cooldown: Duration::from_secs(60),
            half_open_max_in_flight: 1,
        });
        breaker.record_failure();
        assert_eq!(breaker.state(), State::Open);
        breaker.record_success();
        assert_eq!(breaker.state(), State::Closed);
        assert!(breaker.try_acquire());
    }
}
