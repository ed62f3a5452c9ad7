//! HuggingFace Inference API client for conversational text generation.
//!
//! This client issues the one outbound call the gateway makes: a POST to
//! a serverless model endpoint. See:
//! <https://huggingface.co/docs/api-inference/index>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use super::failure::{FailureClass, classify_status};
use super::traits::CompletionProvider;

/// Default base URL for the HuggingFace Inference API.
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default model. Chosen for stability on short conversational inputs.
pub const DEFAULT_MODEL: &str = "facebook/blenderbot-400M-distill";

/// Client for one fixed text-generation endpoint.
///
/// Holds the credential, the model id, and a reqwest client with the
/// per-attempt timeout baked in. The credential is never logged.
#[derive(Clone)]
pub struct HuggingFaceClient {
    api_key: String,
    model: String,
    http: Client,
    base_url: String,
}

impl HuggingFaceClient {
    /// Create a new client with the given API key, model id, and
    /// per-attempt timeout.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self::with_base_url(api_key, model, timeout, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Self {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            model: model.into(),
            http,
            base_url: base_url.into(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    inputs: &'a str,
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    /// Ask the API to block on a cold model instead of returning 503.
    wait_for_model: bool,
}

#[async_trait]
impl CompletionProvider for HuggingFaceClient {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn complete(&self, prompt: &str) -> Result<Value, FailureClass> {
        let url = format!("{}/models/{}", self.base_url, self.model);

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "sending completion request"
        );

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&CompletionRequest {
                inputs: prompt,
                options: RequestOptions {
                    wait_for_model: true,
                },
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FailureClass::Timeout
                } else if e.is_connect() {
                    FailureClass::Connection(e.to_string())
                } else {
                    FailureClass::Unexpected(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "non-success status from model API");
            return Err(classify_status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                FailureClass::Timeout
            } else if e.is_decode() {
                FailureClass::MalformedBody(e.to_string())
            } else {
                FailureClass::Unexpected(e.to_string())
            }
        })
    }
}
