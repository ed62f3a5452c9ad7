//! Provider trait for the outbound completion call.
//!
//! [`RetryingTransport`](super::RetryingTransport) is generic over this
//! trait so retry/backoff policy is tested against mock providers with
//! no network involved; the real implementation is
//! [`HuggingFaceClient`](super::HuggingFaceClient).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::failure::FailureClass;

/// One attempt against the completion endpoint.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Issue a single outbound request for `prompt`.
    ///
    /// Returns the decoded (but unnormalized) response body on HTTP
    /// success, or the classified failure otherwise. Implementations do
    /// not retry; that is the transport's job.
    async fn complete(&self, prompt: &str) -> Result<Value, FailureClass>;
}

#[async_trait]
impl<T: CompletionProvider + ?Sized> CompletionProvider for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, prompt: &str) -> Result<Value, FailureClass> {
        (**self).complete(prompt).await
    }
}
