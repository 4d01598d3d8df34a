//! Deterministic execution context (C15): a seeded RNG plus an optional
//! frozen clock, so a replayed run reproduces byte-identical output.
//!
//! Ported from `original_source/tests/fixtures/determinism.py`'s
//! `DeterministicContext`/`SeededRandom`. The Python version patches global
//! `random`/`datetime.now` state for the duration of a `with` block; that
//! approach has no idiomatic Rust equivalent (no global mutable RNG, no
//! monkey-patchable `Utc::now`), so here `DeterministicContext` instead
//! *is* the `Clock` the core already accepts as a capability
//! (`findable_types::ports::Clock`), and owns its RNG directly rather than
//! mutating a shared one.

use chrono::{DateTime, Utc};
use findable_types::ports::Clock;
use sha2::{Digest, Sha256};

/// A seeded RNG isolated from any global state, mirroring the Python
/// original's `SeededRandom` (itself a `random.Random(seed)` instance
/// rather than the module-global `random`).
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: fastrand::Rng,
    seed: u64,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Reset back to the initial seed.
    pub fn reset(&mut self) {
        self.rng = fastrand::Rng::with_seed(self.seed);
    }

    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.rng.usize(0..items.len());
        items.get(idx)
    }

    pub fn sample<T: Clone>(&mut self, items: &[T], k: usize) -> Vec<T> {
        let mut shuffled = items.to_vec();
        self.fisher_yates(&mut shuffled);
        shuffled.truncate(k.min(items.len()));
        shuffled
    }

    pub fn shuffle<T: Clone>(&mut self, items: &[T]) -> Vec<T> {
        let mut result = items.to_vec();
        self.fisher_yates(&mut result);
        result
    }

    fn fisher_yates<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.rng.usize(0..=i);
            items.swap(i, j);
        }
    }

    pub fn random(&mut self) -> f64 {
        self.rng.f64()
    }

    pub fn uniform(&mut self, min_val: f64, max_val: f64) -> f64 {
        min_val + self.random() * (max_val - min_val)
    }

    pub fn randint(&mut self, min_val: i64, max_val: i64) -> i64 {
        self.rng.i64(min_val..=max_val)
    }

    /// Box-Muller transform, since `fastrand` has no built-in Gaussian
    /// sampler. Two uniform draws per call, discarding the transform's
    /// second independent output for simplicity.
    pub fn gauss(&mut self, mu: f64, sigma: f64) -> f64 {
        let u1 = self.random().max(f64::MIN_POSITIVE);
        let u2 = self.random();
        let z0 = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mu + sigma * z0
    }
}

/// A deterministic execution context: a seeded RNG plus an optional frozen
/// instant this context reports as "now" through the `Clock` capability.
#[derive(Debug, Clone)]
pub struct DeterministicContext {
    rng: SeededRandom,
    frozen_time: Option<DateTime<Utc>>,
}

impl DeterministicContext {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SeededRandom::new(seed),
            frozen_time: None,
        }
    }

    pub fn with_frozen_time(mut self, frozen_time: DateTime<Utc>) -> Self {
        self.frozen_time = Some(frozen_time);
        self
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn frozen_time(&self) -> Option<DateTime<Utc>> {
        self.frozen_time
    }

    pub fn rng(&mut self) -> &mut SeededRandom {
        &mut self.rng
    }
}

impl Clock for DeterministicContext {
    fn now(&self) -> DateTime<Utc> {
        self.frozen_time.unwrap_or_else(Utc::now)
    }
}

/// Deterministic content hash: SHA-256, truncated to 16 hex characters, to
/// match `original_source/tests/fixtures/determinism.py:content_hash`.
pub fn content_hash(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    hex::encode(digest)[..16].to_string()
}

/// Deterministic request hash for cassette matching: `METHOD|url[|body]`.
pub fn request_hash(method: &str, url: &str, body: Option<&str>) -> String {
    let mut parts = vec![method.to_uppercase(), url.to_string()];
    if let Some(body) = body {
        if !body.is_empty() {
            parts.push(body.to_string());
        }
    }
    content_hash(parts.join("|").as_bytes())
}

/// Deterministic prompt hash for LLM response caching: `prompt[|model]`.
pub fn prompt_hash(prompt: &str, model: Option<&str>) -> String {
    let mut parts = vec![prompt.to_string()];
    if let Some(model) = model {
        parts.push(model.to_string());
    }
    content_hash(parts.join("|").as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_produces_the_same_sequence() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        let draws_a: Vec<i64> = (0..10).map(|_| a.randint(0, 1_000_000)).collect();
        let draws_b: Vec<i64> = (0..10).map(|_| b.randint(0, 1_000_000)).collect();
        assert_eq!(draws_a, draws_b);
    }

    #[test]
    fn reset_replays_the_same_draws() {
        let mut rng = SeededRandom::new(7);
        let first: Vec<f64> = (0..5).map(|_| rng.random()).collect();
        rng.reset();
        let second: Vec<f64> = (0..5).map(|_| rng.random()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn frozen_context_reports_the_frozen_instant() {
        let frozen = DateTime::parse_from_rfc3339("2026-01-29T12:00:00Z").unwrap().with_timezone(&Utc);
        let ctx = DeterministicContext::new(1).with_frozen_time(frozen);
        assert_eq!(ctx.now(), frozen);
    }

    #[test]
    fn request_hash_is_stable_and_method_is_case_insensitive() {
        let a = request_hash("get", "https://example.com/", None);
        let b = request_hash("GET", "https://example.com/", None);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn sample_never_exceeds_the_input_length() {
        let mut rng = SeededRandom::new(3);
        let items = vec![1, 2, 3];
        assert_eq!(rng.sample(&items, 10).len(), 3);
    }
}
