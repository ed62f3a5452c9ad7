//! Core types for conversation history and inference payloads.

pub mod conversation;
pub mod payload;

pub use conversation::HistoryPair;
pub use payload::{InferencePayload, UNEXPECTED_FORMAT_MARKER};
