//! The outbound side of the gateway: the fixed inference endpoint
//! client, failure classification, and the retrying transport.

pub mod failure;
pub mod huggingface;
pub mod retry;
pub mod traits;

pub use failure::{FailureClass, INADEQUATE_RESPONSE_FALLBACK, RetryPolicy};
pub use huggingface::HuggingFaceClient;
pub use retry::{RetryConfig, RetryingTransport};
pub use traits::CompletionProvider;
