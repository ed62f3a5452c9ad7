//! Retry configuration and the retrying transport.
//!
//! [`RetryingTransport`] wraps a [`CompletionProvider`] with the
//! per-failure-class retry policy, expressed as an explicit state
//! machine: `Attempting → {Success, Retrying, Failed}`, with `Retrying`
//! looping back to `Attempting`. Transitions are driven by the
//! [`FailureClass`] table in [`failure`](super::failure), so policy is
//! testable without network I/O.
//!
//! Every terminal state yields a displayable string: `Success` returns
//! the normalized (and now cached) text, `Failed` returns a short
//! user-safe message. Raw errors never escape to the caller.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::budget;
use crate::cache::ResponseCache;
use crate::telemetry;
use crate::types::InferencePayload;

use super::failure::{FailureClass, INADEQUATE_RESPONSE_FALLBACK, RetryPolicy};
use super::traits::CompletionProvider;

/// Normalized text under this many characters counts as inadequate.
const MIN_ADEQUATE_CHARS: usize = 2;

/// Word cap for the salvage heuristic applied after a 400 rejection.
const SALVAGE_MAX_WORDS: usize = 100;

/// Configuration for retry behaviour.
///
/// Backoff is exponential and computed purely from the attempt number
/// (`base * 2^attempt`); server-provided retry hints are ignored.
///
/// ```rust
/// # use huginn::RetryConfig;
/// # use std::time::Duration;
/// let config = RetryConfig::new()
///     .max_attempts(3)
///     .backoff_base(Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Backoff unit; the delay after attempt `n` is `base * 2^n`.
    /// Default: 1s.
    pub backoff_base: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl RetryConfig {
    /// Create a new config with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the backoff unit.
    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Delay before the retry that follows attempt number `attempt`
    /// (1-indexed): `base * 2^attempt`, so delays strictly increase.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Keep only the trailing [`SALVAGE_MAX_WORDS`] whitespace-separated
/// words of a prompt the endpoint rejected as malformed.
fn salvage_prompt(prompt: &str) -> String {
    let words: Vec<&str> = prompt.split_whitespace().collect();
    if words.len() > SALVAGE_MAX_WORDS {
        words[words.len() - SALVAGE_MAX_WORDS..].join(" ")
    } else {
        prompt.to_string()
    }
}

/// Transport states. `Retrying` carries the (possibly salvaged) prompt
/// for the next attempt; terminal states carry the string returned to
/// the caller.
enum TransportState {
    Attempting {
        attempt: u32,
        prompt: String,
    },
    Retrying {
        attempt: u32,
        prompt: String,
        class: FailureClass,
        delay: Option<Duration>,
    },
    Success {
        prompt: String,
        text: String,
    },
    Failed {
        message: String,
    },
}

/// Issues the outbound call with bounded retries, normalizes the
/// response, and caches the result on success.
pub struct RetryingTransport<P: CompletionProvider> {
    provider: P,
    cache: Arc<ResponseCache>,
    config: RetryConfig,
    max_input_chars: usize,
}

impl<P: CompletionProvider> RetryingTransport<P> {
    /// Wrap a provider with retry policy and a response cache.
    pub fn new(
        provider: P,
        cache: Arc<ResponseCache>,
        config: RetryConfig,
        max_input_chars: usize,
    ) -> Self {
        Self {
            provider,
            cache,
            config,
            max_input_chars,
        }
    }

    /// Run the state machine to completion and return displayable text.
    ///
    /// The prompt is clamped to the max input length on entry; the
    /// cache write on success is keyed by the prompt actually sent on
    /// the final attempt (post-clamp, post-salvage), not the caller's
    /// original.
    pub async fn send(&self, prompt: &str) -> String {
        let started = Instant::now();
        let mut state = TransportState::Attempting {
            attempt: 1,
            prompt: budget::clamp_text(prompt, self.max_input_chars).to_string(),
        };

        loop {
            state = match state {
                TransportState::Attempting { attempt, prompt } => {
                    self.run_attempt(attempt, prompt).await
                }
                TransportState::Retrying {
                    attempt,
                    prompt,
                    class,
                    delay,
                } => {
                    metrics::counter!(telemetry::RETRIES_TOTAL, "class" => class.label())
                        .increment(1);
                    tracing::warn!(
                        provider = self.provider.name(),
                        attempt,
                        max_attempts = self.config.max_attempts,
                        class = class.label(),
                        delay_ms = delay.map(|d| d.as_millis() as u64).unwrap_or(0),
                        "retrying after failed attempt"
                    );
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }
                    TransportState::Attempting {
                        attempt: attempt + 1,
                        prompt,
                    }
                }
                TransportState::Success { prompt, text } => {
                    self.cache.store(&prompt, &text).await;
                    metrics::counter!(telemetry::REQUESTS_TOTAL, "status" => "ok").increment(1);
                    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS)
                        .record(started.elapsed().as_secs_f64());
                    return text;
                }
                TransportState::Failed { message } => {
                    metrics::counter!(telemetry::REQUESTS_TOTAL, "status" => "error").increment(1);
                    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS)
                        .record(started.elapsed().as_secs_f64());
                    return message;
                }
            };
        }
    }

    async fn run_attempt(&self, attempt: u32, prompt: String) -> TransportState {
        tracing::debug!(
            provider = self.provider.name(),
            attempt,
            max_attempts = self.config.max_attempts,
            "attempting completion"
        );
        match self.provider.complete(&prompt).await {
            Ok(value) => {
                let text = InferencePayload::from_value(value).extract_text();
                if text.chars().count() < MIN_ADEQUATE_CHARS {
                    tracing::warn!(attempt, "response text empty or too short");
                    self.next_state(attempt, prompt, FailureClass::InadequateText)
                } else {
                    TransportState::Success { prompt, text }
                }
            }
            Err(class) => self.next_state(attempt, prompt, class),
        }
    }

    /// Transition out of a failed attempt.
    fn next_state(&self, attempt: u32, prompt: String, class: FailureClass) -> TransportState {
        if attempt < self.config.max_attempts {
            match class.retry_policy() {
                RetryPolicy::RetryAfterBackoff => TransportState::Retrying {
                    attempt,
                    prompt,
                    delay: Some(self.config.delay_for_attempt(attempt)),
                    class,
                },
                RetryPolicy::RetryAfterSalvage => TransportState::Retrying {
                    attempt,
                    prompt: salvage_prompt(&prompt),
                    delay: None,
                    class,
                },
                RetryPolicy::GiveUp => {
                    tracing::error!(class = class.label(), "permanent failure, not retrying");
                    TransportState::Failed {
                        message: class.user_message(),
                    }
                }
            }
        } else if class.is_soft() {
            // Exhausted attempts on a soft failure still resolve to a
            // usable reply, and that reply is cached like any success.
            TransportState::Success {
                prompt,
                text: INADEQUATE_RESPONSE_FALLBACK.to_string(),
            }
        } else {
            tracing::error!(
                class = class.label(),
                attempts = attempt,
                "attempts exhausted"
            );
            TransportState::Failed {
                message: class.user_message(),
            }
        }
    }
}
