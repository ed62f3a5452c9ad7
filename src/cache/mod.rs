//! Content-addressed response cache with time-based expiry.
//!
//! [`ResponseCache`] maps a fingerprint of the exact outbound prompt
//! text to a previously produced response. Storage lives behind the
//! [`CacheStore`] trait so the backing table can be SQLite on disk
//! ([`SqliteStore`]), process memory ([`MemoryStore`]), or nothing at
//! all ([`NullStore`], the degraded always-miss mode).

pub mod response;
pub mod store;

pub use response::{CacheConfig, ResponseCache};
pub use store::{CacheEntry, CacheStore, MemoryStore, NullStore, SqliteStore};
