//! Caching layer for opening hours.
//!
//! Hours change rarely, so the weekday lines for each place are kept for a
//! long TTL (12 hours by default). Only successful fetches are stored: an
//! API failure is returned to the caller and the next request tries again.
//!
//! There is no single-flight protection. Two requests that miss at the same
//! time will both hit the API, and the later write wins.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use md5::{Digest, Md5};
use moka::Expiry;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::places::{FetchError, HoursSource};

/// Prefix of every cache key.
const KEY_PREFIX: &str = "gmb_hours_";

/// Cached weekday lines.
pub type HoursEntry = Arc<Vec<String>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl CacheConfig {
    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(12 * 60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Key/value store with per-entry TTL.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a live entry. Expired entries are treated as absent.
    async fn get(&self, key: &str) -> Option<HoursEntry>;

    /// Store `value` under `key` for `ttl`, replacing any existing entry.
    async fn set(&self, key: &str, value: HoursEntry, ttl: Duration);

    /// Remove the entry under `key`, if any.
    async fn delete(&self, key: &str);
}

/// Stored value plus the TTL it was written with.
#[derive(Debug, Clone)]
struct StoredHours {
    lines: HoursEntry,
    ttl: Duration,
}

/// Expires each entry after the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, StoredHours> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredHours,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredHours,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process [`CacheStore`] backed by moka.
#[derive(Clone)]
pub struct MokaStore {
    entries: MokaCache<String, StoredHours>,
}

impl MokaStore {
    /// Create a new store holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { entries }
    }
}

#[async_trait]
impl CacheStore for MokaStore {
    async fn get(&self, key: &str) -> Option<HoursEntry> {
        self.entries.get(key).await.map(|stored| stored.lines)
    }

    async fn set(&self, key: &str, value: HoursEntry, ttl: Duration) {
        let stored = StoredHours { lines: value, ttl };
        self.entries.insert(key.to_string(), stored).await;
    }

    async fn delete(&self, key: &str) {
        self.entries.invalidate(key).await;
    }
}

/// Compute the cache key for a place: `gmb_hours_` + hex MD5 of the ID.
pub fn cache_key(place_id: &str) -> String {
    format!("{KEY_PREFIX}{}", hex::encode(Md5::digest(place_id.as_bytes())))
}

/// Hours source with read-through caching.
///
/// Wraps an [`HoursSource`] and stores successful responses in a
/// [`CacheStore`].
pub struct CachedHoursClient<S> {
    source: S,
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl<S: HoursSource> CachedHoursClient<S> {
    /// Create a new cached client.
    pub fn new(source: S, store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            source,
            store,
            ttl: config.ttl,
        }
    }

    /// Get the weekday lines for a place, using the cache if available.
    ///
    /// Errors from the source are returned unchanged and never cached.
    pub async fn get_hours(&self, place_id: &str) -> Result<HoursEntry, FetchError> {
        let key = cache_key(place_id);

        // Try cache first
        if let Some(cached) = self.store.get(&key).await {
            debug!(place_id, key = %key, "opening hours cache hit");
            return Ok(cached);
        }

        debug!(place_id, key = %key, "opening hours cache miss");
        let lines = Arc::new(self.source.fetch_hours(place_id).await?);

        self.store.set(&key, lines.clone(), self.ttl).await;
        debug!(place_id, key = %key, ttl_secs = self.ttl.as_secs(), "stored opening hours");

        Ok(lines)
    }

    /// Drop the cached entry for a place so the next call refetches.
    pub async fn invalidate(&self, place_id: &str) {
        self.store.delete(&cache_key(place_id)).await;
    }
}
