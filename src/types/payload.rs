//! Normalization of loosely-typed inference responses.
//!
//! The wrapped endpoint does not firmly contract its response shape: a
//! successful call may return an object with `generated_text`, an object
//! with an `error` field, an array of generation objects, or something
//! else entirely. [`InferencePayload`] names the recognized shapes as a
//! tagged union, decided once by inspection at the decode boundary, so
//! the rest of the crate never probes raw JSON.

use serde_json::Value;

/// Returned when no recognized shape and no usable text field is found.
pub const UNEXPECTED_FORMAT_MARKER: &str = "Unexpected response format from the model API.";

/// Minimum length for a string field to be considered usable text by the
/// fallback scan.
const FALLBACK_MIN_CHARS: usize = 5;

/// A decoded inference response, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum InferencePayload {
    /// Object carrying generated text: `{"generated_text": "..."}`.
    Generated { text: String },
    /// Object carrying an error indicator: `{"error": "..."}`.
    ///
    /// This is a recognized-but-negative outcome, not a transport
    /// failure; classification for retry purposes happens in the
    /// transport, never here.
    ApiError { message: String },
    /// Array whose first element carries generated text:
    /// `[{"generated_text": "..."}]`.
    BatchGenerated { text: String },
    /// Anything else; kept verbatim for the fallback scan.
    Unknown(Value),
}

impl InferencePayload {
    /// Classify a decoded response body.
    pub fn from_value(value: Value) -> Self {
        if let Some(obj) = value.as_object() {
            if let Some(text) = obj.get("generated_text").and_then(Value::as_str) {
                return Self::Generated {
                    text: text.trim().to_string(),
                };
            }
            if let Some(err) = obj.get("error") {
                let message = match err.as_str() {
                    Some(s) => s.to_string(),
                    None => err.to_string(),
                };
                return Self::ApiError { message };
            }
        }
        if let Some(first) = value.as_array().and_then(|a| a.first())
            && let Some(text) = first.get("generated_text").and_then(Value::as_str)
        {
            return Self::BatchGenerated {
                text: text.trim().to_string(),
            };
        }
        Self::Unknown(value)
    }

    /// Extract a displayable reply from the payload.
    ///
    /// Never fails: unrecognized shapes fall back to scanning the
    /// top-level object (or the first element of an array) for any
    /// string field longer than [`FALLBACK_MIN_CHARS`] characters, in
    /// serde_json's field-iteration order (lexicographic by key), and
    /// finally to [`UNEXPECTED_FORMAT_MARKER`].
    pub fn extract_text(&self) -> String {
        match self {
            Self::Generated { text } | Self::BatchGenerated { text } => text.clone(),
            Self::ApiError { message } => {
                tracing::warn!(error = %message, "inference API returned an error payload");
                format!("API error: {message}")
            }
            Self::Unknown(value) => scan_for_text(value).unwrap_or_else(|| {
                tracing::warn!("unrecognized response shape, no usable text field");
                UNEXPECTED_FORMAT_MARKER.to_string()
            }),
        }
    }
}

/// Best-effort scan for a usable text field in an unrecognized payload.
fn scan_for_text(value: &Value) -> Option<String> {
    let obj = match value {
        Value::Object(map) => Some(map),
        Value::Array(items) => items.first().and_then(Value::as_object),
        _ => None,
    }?;
    obj.values().find_map(|v| {
        v.as_str()
            .filter(|s| s.chars().count() > FALLBACK_MIN_CHARS)
            .map(|s| s.trim().to_string())
    })
}
