//! Huginn - Resilient client gateway for conversational text generation
//!
//! This crate mediates between a conversational caller and a remote
//! text-generation inference endpoint. One call turns a user message
//! plus bounded conversation history into a single outbound request,
//! absorbs the endpoint's transient failure modes (rate limiting,
//! cold-start delays, malformed responses, timeouts) behind bounded
//! retries, and caches results so repeated identical requests skip the
//! network entirely.
//!
//! The gateway holds no conversation state: the host owns history and
//! passes it in per call. Every call resolves to a displayable string —
//! success text, a soft-failure fallback, or a short user-safe error
//! message — never a raised error.
//!
//! # Example
//!
//! ```rust,no_run
//! use huginn::{HistoryPair, InferenceGateway};
//!
//! #[tokio::main]
//! async fn main() -> huginn::Result<()> {
//!     let gateway = InferenceGateway::builder()
//!         .api_key("hf_your_key")
//!         .cache_path("chat_cache.db")
//!         .build()
//!         .await?;
//!
//!     let history = vec![HistoryPair::new("Hi!", "Hello! How can I help?")];
//!     let reply = gateway.respond(&history, "Tell me about ravens.").await;
//!
//!     println!("{reply}");
//!     Ok(())
//! }
//! ```

pub mod budget;
pub mod cache;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod telemetry;
pub mod types;

// Re-export main types at crate root
pub use cache::{CacheConfig, CacheEntry, CacheStore, MemoryStore, NullStore, ResponseCache, SqliteStore};
pub use error::{HuginnError, Result};
pub use gateway::{EMPTY_INPUT_MESSAGE, GatewayBuilder, GatewayConfig, InferenceGateway};
pub use providers::{
    CompletionProvider, FailureClass, HuggingFaceClient, INADEQUATE_RESPONSE_FALLBACK, RetryConfig,
    RetryPolicy, RetryingTransport,
};
pub use types::{HistoryPair, InferencePayload, UNEXPECTED_FORMAT_MARKER};
