//! Content-addressed response cache with read-time expiry.
//!
//! [`ResponseCache`] sits in front of a [`CacheStore`] and owns the two
//! policies the store does not: fingerprinting (SHA-256 over the exact
//! outbound prompt text) and validity (`now - stored_at < ttl`, checked
//! on every read). Expired rows are never returned but are left in
//! storage; the next write to the same fingerprint overwrites them.
//!
//! The cache is a performance optimization, never a correctness
//! dependency: any storage failure is logged and treated as a miss on
//! read and a no-op on write. Callers never block on cache durability.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

use crate::telemetry;

use super::store::{CacheEntry, CacheStore};

/// Configuration for the response cache.
///
/// ```rust
/// # use huginn::CacheConfig;
/// # use std::time::Duration;
/// let config = CacheConfig::new().ttl(Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Time-to-live for cached entries. Default: 1 hour.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(3600),
        }
    }
}

impl CacheConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the time-to-live for cached entries.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Unix time in seconds.
fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Response cache over a pluggable store.
pub struct ResponseCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    clock: fn() -> u64,
}

impl ResponseCache {
    /// Create a cache over `store` with the given configuration.
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            ttl: config.ttl,
            clock: unix_now,
        }
    }

    /// Create a cache with a custom time source.
    ///
    /// Lets tests simulate clock advancement instead of sleeping
    /// through the TTL.
    pub fn with_clock(store: Arc<dyn CacheStore>, config: &CacheConfig, clock: fn() -> u64) -> Self {
        Self {
            store,
            ttl: config.ttl,
            clock,
        }
    }

    /// Deterministic digest of the exact outbound prompt text.
    pub fn fingerprint(prompt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(prompt.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    /// Look up a previously cached response for this prompt.
    ///
    /// Returns `None` on miss, on an expired entry, and on any storage
    /// failure. Emits hit/miss metrics.
    pub async fn lookup(&self, prompt: &str) -> Option<String> {
        let fingerprint = Self::fingerprint(prompt);
        match self.store.get(&fingerprint).await {
            Ok(Some(entry)) => {
                let age = (self.clock)().saturating_sub(entry.stored_at);
                if age < self.ttl.as_secs() {
                    metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
                    tracing::debug!(age_secs = age, "cache hit");
                    Some(entry.response)
                } else {
                    metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                    tracing::debug!(age_secs = age, "cache entry expired");
                    None
                }
            }
            Ok(None) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                None
            }
            Err(e) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                tracing::warn!(store = self.store.name(), error = %e, "cache lookup failed");
                None
            }
        }
    }

    /// Store a response keyed by this prompt, overwriting any previous
    /// entry for the same fingerprint.
    ///
    /// Storage failures are logged and otherwise ignored.
    pub async fn store(&self, prompt: &str, response: &str) {
        let entry = CacheEntry {
            fingerprint: Self::fingerprint(prompt),
            response: response.to_string(),
            stored_at: (self.clock)(),
        };
        if let Err(e) = self.store.put(&entry).await {
            tracing::warn!(store = self.store.name(), error = %e, "cache store failed");
        }
    }
}
