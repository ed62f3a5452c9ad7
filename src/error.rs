//! Huginn error types
//!
//! Deliberately small: a gateway call never raises. Transport failures
//! are classified and resolved into displayable text inside the retry
//! transport, and cache storage failures are swallowed at the cache
//! boundary. What remains is construction-time configuration problems
//! and the [`CacheStore`](crate::cache::CacheStore) contract.

/// Huginn error types
#[derive(Debug, thiserror::Error)]
pub enum HuginnError {
    // Cache storage errors — never fatal to a gateway call
    #[error("cache error: {0}")]
    Cache(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for Huginn operations
pub type Result<T> = std::result::Result<T, HuginnError>;
