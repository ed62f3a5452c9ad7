//! Cache storage backends.
//!
//! One logical table: `(fingerprint TEXT PRIMARY KEY, response TEXT,
//! stored_at INTEGER)`. Backends must support idempotent
//! create-if-absent, point lookup by key, and upsert by key. Expiry is
//! NOT a backend concern: rows are never evicted here, and a stale row
//! stays in storage until the next write to the same fingerprint.
//! Validity is decided at read time by
//! [`ResponseCache`](super::ResponseCache).
//!
//! Writes are last-writer-wins per fingerprint; no isolation beyond the
//! backend's single upsert is required, since concurrent writers for the
//! same fingerprint write the same eventual value.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tokio::sync::RwLock;

use crate::{HuginnError, Result};

/// One cached response row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Digest of the outbound prompt text (primary key).
    pub fingerprint: String,
    /// The normalized response text.
    pub response: String,
    /// Insertion time, unix seconds.
    pub stored_at: u64,
}

/// Storage boundary for cache rows.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &'static str;

    /// Create the backing schema if absent. Safe to call repeatedly.
    async fn init(&self) -> Result<()>;

    /// Point lookup by fingerprint.
    async fn get(&self, fingerprint: &str) -> Result<Option<CacheEntry>>;

    /// Upsert by fingerprint (last writer wins).
    async fn put(&self, entry: &CacheEntry) -> Result<()>;
}

// ============================================================================
// SqliteStore
// ============================================================================

/// File-backed store on a SQLite table.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if missing) a SQLite database at `path` and ensure
    /// the cache table exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| HuginnError::Cache(e.to_string()))?;
        let store = Self { pool };
        store.init().await?;
        Ok(store)
    }
}

#[async_trait]
impl CacheStore for SqliteStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS response_cache (
                fingerprint TEXT PRIMARY KEY,
                response    TEXT NOT NULL,
                stored_at   INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HuginnError::Cache(e.to_string()))?;
        Ok(())
    }

    async fn get(&self, fingerprint: &str) -> Result<Option<CacheEntry>> {
        let row = sqlx::query_as::<_, (String, i64)>(
            "SELECT response, stored_at FROM response_cache WHERE fingerprint = ?1",
        )
        .bind(fingerprint)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| HuginnError::Cache(e.to_string()))?;

        Ok(row.map(|(response, stored_at)| CacheEntry {
            fingerprint: fingerprint.to_string(),
            response,
            stored_at: stored_at.max(0) as u64,
        }))
    }

    async fn put(&self, entry: &CacheEntry) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO response_cache (fingerprint, response, stored_at) \
             VALUES (?1, ?2, ?3)",
        )
        .bind(&entry.fingerprint)
        .bind(&entry.response)
        .bind(entry.stored_at as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| HuginnError::Cache(e.to_string()))?;
        Ok(())
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-process store on a HashMap. Default when no database path is
/// configured; also used by tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, fingerprint: &str) -> Result<Option<CacheEntry>> {
        Ok(self.entries.read().await.get(fingerprint).cloned())
    }

    async fn put(&self, entry: &CacheEntry) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(entry.fingerprint.clone(), entry.clone());
        Ok(())
    }
}

// ============================================================================
// NullStore
// ============================================================================

/// Always-miss, no-op store. The gateway degrades to this when the
/// configured backing store cannot be created.
pub struct NullStore;

impl NullStore {
    /// Create a null store.
    pub fn new() -> Self {
        Self
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for NullStore {
    fn name(&self) -> &'static str {
        "null"
    }

    async fn init(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, _fingerprint: &str) -> Result<Option<CacheEntry>> {
        Ok(None)
    }

    async fn put(&self, _entry: &CacheEntry) -> Result<()> {
        Ok(())
    }
}
