//! Builder wiring config, credential, and cache storage into a gateway.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheConfig, CacheStore, MemoryStore, NullStore, ResponseCache, SqliteStore};
use crate::providers::{HuggingFaceClient, RetryConfig, RetryingTransport};
use crate::{HuginnError, Result};

use super::{GatewayConfig, InferenceGateway};

/// Builder for [`InferenceGateway`].
///
/// ```rust,no_run
/// # use huginn::InferenceGateway;
/// # #[tokio::main]
/// # async fn main() -> huginn::Result<()> {
/// let gateway = InferenceGateway::builder()
///     .api_key(std::env::var("HF_API_KEY").unwrap_or_default())
///     .cache_path("chat_cache.db")
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct GatewayBuilder {
    api_key: Option<String>,
    config: GatewayConfig,
    base_url: Option<String>,
    cache_store: Option<Arc<dyn CacheStore>>,
    cache_path: Option<PathBuf>,
}

impl GatewayBuilder {
    pub(crate) fn new() -> Self {
        Self {
            api_key: None,
            config: GatewayConfig::default(),
            base_url: None,
            cache_store: None,
            cache_path: None,
        }
    }

    /// Set the API credential. Required; supplied by the host
    /// application (environment, secret manager).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Replace the default [`GatewayConfig`].
    pub fn config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the endpoint base URL (for testing with wiremock).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Persist the response cache in a SQLite database at this path.
    /// Without this (or [`cache_store`](Self::cache_store)) the cache
    /// lives in process memory.
    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    /// Use a custom cache store.
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache_store = Some(store);
        self
    }

    /// Build the gateway.
    ///
    /// Fails only on configuration errors (a missing credential). An
    /// unusable cache store is not fatal: the gateway degrades to an
    /// always-miss cache and logs the reason.
    pub async fn build(self) -> Result<InferenceGateway> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| HuginnError::Configuration("API key is required".into()))?;
        if api_key.len() < 8 {
            tracing::warn!("API key is suspiciously short");
        }

        let store: Arc<dyn CacheStore> = match (self.cache_store, self.cache_path) {
            (Some(store), _) => store,
            (None, Some(path)) => match SqliteStore::open(&path).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "cache store unavailable, degrading to always-miss"
                    );
                    Arc::new(NullStore::new())
                }
            },
            (None, None) => Arc::new(MemoryStore::new()),
        };

        let cache = Arc::new(ResponseCache::new(
            store,
            &CacheConfig::new().ttl(Duration::from_secs(self.config.cache_ttl_secs)),
        ));

        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        let client = match self.base_url {
            Some(url) => {
                HuggingFaceClient::with_base_url(api_key, self.config.model.clone(), timeout, url)
            }
            None => HuggingFaceClient::new(api_key, self.config.model.clone(), timeout),
        };

        let transport = RetryingTransport::new(
            client,
            Arc::clone(&cache),
            RetryConfig::new().max_attempts(self.config.max_attempts),
            self.config.max_input_chars,
        );

        Ok(InferenceGateway::from_parts(transport, cache, self.config))
    }
}
