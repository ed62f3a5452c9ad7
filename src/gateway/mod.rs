//! The gateway façade: one inbound call, one displayable result.

mod builder;

pub use builder::GatewayBuilder;

use serde::Deserialize;

use crate::budget;
use crate::cache::ResponseCache;
use crate::providers::{HuggingFaceClient, RetryingTransport};
use crate::types::HistoryPair;

use std::sync::Arc;

/// Returned when the incoming user text is empty or whitespace-only.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a non-empty message.";

/// Gateway constants, immutable once built.
///
/// The hosting layer sources fresh values and rebuilds the gateway when
/// it wants different ones; nothing here is mutated at runtime. All
/// fields are externally overridable via the builder setters or by
/// deserializing from the host's config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Hard cap on history pairs considered per call. Default: 10.
    pub max_history_turns: usize,
    /// Approximate token budget for history. Default: 800. Kept low on
    /// purpose; the endpoint degrades under long inputs.
    pub max_history_tokens: usize,
    /// Maximum input (and outbound prompt) length in characters.
    /// Default: 512.
    pub max_input_chars: usize,
    /// Cache entry time-to-live in seconds. Default: 3600.
    pub cache_ttl_secs: u64,
    /// Maximum attempts per transport call. Default: 3.
    pub max_attempts: u32,
    /// Per-attempt network timeout in seconds. Default: 30.
    pub request_timeout_secs: u64,
    /// Model id on the inference endpoint.
    pub model: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_history_turns: 10,
            max_history_tokens: 800,
            max_input_chars: 512,
            cache_ttl_secs: 3600,
            max_attempts: 3,
            request_timeout_secs: 30,
            model: crate::providers::huggingface::DEFAULT_MODEL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Create a config with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the history turn cap.
    pub fn max_history_turns(mut self, n: usize) -> Self {
        self.max_history_turns = n;
        self
    }

    /// Set the approximate history token budget.
    pub fn max_history_tokens(mut self, n: usize) -> Self {
        self.max_history_tokens = n;
        self
    }

    /// Set the maximum input length in characters.
    pub fn max_input_chars(mut self, n: usize) -> Self {
        self.max_input_chars = n;
        self
    }

    /// Set the cache TTL in seconds.
    pub fn cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    /// Set the maximum attempts per transport call.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the per-attempt timeout in seconds.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Set the model id.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

/// Resilient inference gateway.
///
/// Composes the budget manager, response cache, and retrying transport
/// behind one call. Holds no conversation state: history is owned by
/// the caller and read for the duration of one call only.
pub struct InferenceGateway {
    transport: RetryingTransport<HuggingFaceClient>,
    cache: Arc<ResponseCache>,
    config: GatewayConfig,
}

impl std::fmt::Debug for InferenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl InferenceGateway {
    /// Start building a gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    pub(crate) fn from_parts(
        transport: RetryingTransport<HuggingFaceClient>,
        cache: Arc<ResponseCache>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            transport,
            cache,
            config,
        }
    }

    /// Respond to a conversation turn.
    ///
    /// Infallible by design: success text, a soft-failure fallback, a
    /// failure message, and a validation message are all plain strings
    /// safe to display directly. Empty input short-circuits before any
    /// cache or network activity; a cache hit short-circuits before any
    /// network activity.
    pub async fn respond(&self, history: &[HistoryPair], new_user_text: &str) -> String {
        if new_user_text.trim().is_empty() {
            return EMPTY_INPUT_MESSAGE.to_string();
        }

        let input = budget::clamp_text(new_user_text, self.config.max_input_chars);
        if input.len() < new_user_text.len() {
            tracing::warn!(
                max_chars = self.config.max_input_chars,
                "input truncated to maximum length"
            );
        }

        let kept = budget::truncate_history(
            history,
            self.config.max_history_turns,
            self.config.max_history_tokens,
        );
        let prompt = budget::assemble_prompt(kept, input);
        // The outbound prompt obeys the same length cap as the raw
        // input; this clamped text is the cache key and what the
        // transport sends.
        let prompt = budget::clamp_text(&prompt, self.config.max_input_chars);

        if let Some(cached) = self.cache.lookup(prompt).await {
            return cached;
        }

        self.transport.send(prompt).await
    }
}
