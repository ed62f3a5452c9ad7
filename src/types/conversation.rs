//! Caller-owned conversation history types.
//!
//! The gateway never stores history. The host application owns the full
//! conversation and passes a slice of [`HistoryPair`]s (oldest first)
//! into every [`respond`](crate::InferenceGateway::respond) call; the
//! gateway only reads it for the duration of that call.

use serde::{Deserialize, Serialize};

use crate::budget;

/// One completed exchange: what the user said and what the model replied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPair {
    /// The user's message.
    pub user: String,
    /// The assistant's reply.
    pub assistant: String,
}

impl HistoryPair {
    /// Create a pair from user and assistant text.
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    /// Approximate token cost of both sides of the exchange.
    pub fn estimated_tokens(&self) -> usize {
        budget::estimate_tokens(&self.user) + budget::estimate_tokens(&self.assistant)
    }
}
