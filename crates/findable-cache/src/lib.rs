//! # Findable Cache
//!
//! C4 of the audit pipeline: a TTL-keyed cache over crawl results (and
//! anything else content-addressable by URL), plus a
//! `get_cached_or_fetch` helper that wraps a fallible producer with
//! lookup-or-populate semantics.

use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::debug;

/// Generic cache capability, implemented here by `InMemoryCache` and
/// intended to also be backed by `findable_types::ports::PersistenceStore`
/// for cross-run reuse.
#[async_trait]
pub trait Cache<T: Clone + Send + Sync + 'static>: Send + Sync {
    async fn get(&self, key: &str) -> Option<T>;
    async fn put(&self, key: &str, value: T, ttl: Duration);
    async fn invalidate(&self, key: &str);
}

struct Entry<T> {
    value: T,
    expires_at: Instant,
}

/// A `DashMap`-backed cache with per-entry TTL, lazily swept on read.
pub struct InMemoryCache<T> {
    entries: DashMap<String, Entry<T>>,
}

impl<T> Default for InMemoryCache<T> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<T> InMemoryCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + 'static> Cache<T> for InMemoryCache<T> {
    async fn get(&self, key: &str) -> Option<T> {
        match self.entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                drop(self.entries.get(key));
                self.entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn put(&self, key: &str, value: T, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn invalidate(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// Deterministic cache key for a normalized URL: the hex SHA-256 digest,
/// so keys are fixed-width and safe to use as persistence-layer row keys.
pub fn cache_key(normalized_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalized_url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Look up `key` in `cache`; on miss, call `fetch` and populate the cache
/// with the result under `ttl` before returning it.
pub async fn get_cached_or_fetch<T, F, Fut>(
    cache: &(dyn Cache<T>),
    key: &str,
    ttl: Duration,
    fetch: F,
) -> anyhow::Result<T>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    if let Some(cached) = cache.get(key).await {
        debug!(key, "cache hit");
        return Ok(cached);
    }
    debug!(key, "cache miss");
    let value = fetch().await?;
    cache.put(key, value.clone(), ttl).await;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_hits() {
        let cache: InMemoryCache<String> = InMemoryCache::new();
        cache.put("a", "value".to_string(), Duration::from_secs(10)).await;
        assert_eq!(cache.get("a").await, Some("value".to_string()));
    }

    #[tokio::test]
    async fn expired_entry_misses() {
        let cache: InMemoryCache<String> = InMemoryCache::new();
        cache
            .put("a", "value".to_string(), Duration::from_millis(1))
            .await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.get("a").await, None);
    }

    #[tokio::test]
    async fn get_cached_or_fetch_only_calls_fetch_once() {
        let cache: InMemoryCache<u32> = InMemoryCache::new();
        let calls = std::sync::atomic::AtomicU32::new(0);

        let fetch_once = || async {
            calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok::<u32, anyhow::Error>(42)
        };

        let first = get_cached_or_fetch(&cache, "k", Duration::from_secs(60), fetch_once)
            .await
            .unwrap();
        let second = get_cached_or_fetch(&cache, "k", Duration::from_secs(60), fetch_once)
            .await
            .unwrap();

        assert_eq!(first, 42);
        assert_eq!(second, 42);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn cache_key_is_deterministic() {
        assert_eq!(
            cache_key("https://example.com/"),
            cache_key("https://example.com/")
        );
        assert_ne!(cache_key("https://example.com/a"), cache_key("https://example.com/b"));
    }
}
