//! Typed classification of attempt failures.
//!
//! Every failed attempt is classified into a [`FailureClass`] at the
//! I/O boundary; the retry state machine consumes only the class. The
//! class → policy mapping lives in one table ([`FailureClass::retry_policy`])
//! so retry decisions are testable without any network involvement.

/// Classified outcome of one failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureClass {
    /// HTTP 400. The request shape was rejected; retry after shrinking
    /// the prompt.
    BadRequest,
    /// HTTP 429.
    RateLimited,
    /// HTTP 5xx.
    ServerError(u16),
    /// Any other 4xx. Not transient; never retried.
    ClientError(u16),
    /// The attempt's timeout expired.
    Timeout,
    /// Connection-level failure (DNS, refused, TLS). Retrying the same
    /// misconfigured path is futile; never retried.
    Connection(String),
    /// Response body was not parseable as structured data.
    MalformedBody(String),
    /// Parse succeeded but the normalized text is empty or under 2
    /// characters. Soft: exhaustion resolves to a fallback reply, not
    /// a failure.
    InadequateText,
    /// Anything else that broke during the attempt.
    Unexpected(String),
}

/// What the transport does with a failure when attempts remain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Sleep the backoff delay, then retry the same prompt.
    RetryAfterBackoff,
    /// Retry immediately with a salvaged (shrunk) prompt.
    RetryAfterSalvage,
    /// Do not retry.
    GiveUp,
}

impl FailureClass {
    /// Policy table for this class, applicable while attempts remain.
    /// On the last attempt every class resolves terminally: soft
    /// failures into a fallback success, everything else into a failure
    /// message.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::BadRequest => RetryPolicy::RetryAfterSalvage,
            Self::RateLimited
            | Self::ServerError(_)
            | Self::Timeout
            | Self::MalformedBody(_)
            | Self::InadequateText => RetryPolicy::RetryAfterBackoff,
            Self::ClientError(_) | Self::Connection(_) | Self::Unexpected(_) => RetryPolicy::GiveUp,
        }
    }

    /// Soft failures resolve to a fallback reply instead of an error
    /// message when attempts run out.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::InadequateText)
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::RateLimited => "rate_limited",
            Self::ServerError(_) => "server_error",
            Self::ClientError(_) => "client_error",
            Self::Timeout => "timeout",
            Self::Connection(_) => "connection",
            Self::MalformedBody(_) => "malformed_body",
            Self::InadequateText => "inadequate_text",
            Self::Unexpected(_) => "unexpected",
        }
    }

    /// User-safe message for a terminal failure of this class. Raw
    /// error details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest => {
                "Request error: invalid format. Try a shorter message.".to_string()
            }
            Self::RateLimited => {
                "The model API is rate limited. Please try again in a moment.".to_string()
            }
            Self::ServerError(_) => {
                "The model API had a server error. Try again later.".to_string()
            }
            Self::ClientError(status) => format!("Request error: {status}"),
            Self::Timeout => "Timed out waiting for the model API.".to_string(),
            Self::Connection(_) => "Could not connect to the model API.".to_string(),
            Self::MalformedBody(_) => "Invalid response from the model API.".to_string(),
            Self::InadequateText => INADEQUATE_RESPONSE_FALLBACK.to_string(),
            Self::Unexpected(detail) => format!("An error occurred: {detail}"),
        }
    }
}

/// Classify a non-success HTTP status.
pub(crate) fn classify_status(status: u16) -> FailureClass {
    match status {
        400 => FailureClass::BadRequest,
        429 => FailureClass::RateLimited,
        500..=599 => FailureClass::ServerError(status),
        other => FailureClass::ClientError(other),
    }
}

/// Fixed reply when the model never produced adequate text.
pub const INADEQUATE_RESPONSE_FALLBACK: &str =
    "Sorry, I could not produce an adequate response. Could you rephrase?";
