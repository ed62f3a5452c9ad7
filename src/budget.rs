//! Conversation-context budget management.
//!
//! Bounds history and prompt size before anything leaves the process.
//! The wrapped endpoint is unstable under long inputs, so history is
//! deliberately over-truncated relative to real token accounting: the
//! estimate here is a character heuristic, and the assembled context is
//! capped far below what the caps on history alone would allow.
//!
//! All functions are pure over caller-supplied state; nothing in this
//! module holds history across calls.

use crate::types::HistoryPair;

/// Characters per approximate token.
pub const CHARS_PER_TOKEN: usize = 4;

/// At most this many history pairs are considered when assembling the
/// prompt, regardless of the configured turn/token caps.
pub const CONTEXT_WINDOW_PAIRS: usize = 3;

/// Maximum length of the assembled context string, in characters.
/// Overflow is dropped from the front (the oldest text).
pub const CONTEXT_CHAR_CAP: usize = 200;

/// Approximate token cost of a text: character count divided by
/// [`CHARS_PER_TOKEN`], rounded down.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / CHARS_PER_TOKEN
}

/// Bound history by turn count, then by approximate token budget.
///
/// Two independent caps, applied in sequence:
///
/// 1. If there are more than `max_turns` pairs, keep only the most
///    recent `max_turns`. This cap short-circuits: the token budget
///    below is not evaluated.
/// 2. Otherwise, drop pairs from the oldest end, one at a time, until
///    the remaining total estimated cost is at or under `max_tokens`
///    or the history is empty.
///
/// Returns a subslice of the input, so order is preserved and only
/// prefix removal can occur. Idempotent: applying it to its own output
/// yields the same output.
pub fn truncate_history<'a>(
    history: &'a [HistoryPair],
    max_turns: usize,
    max_tokens: usize,
) -> &'a [HistoryPair] {
    if history.len() > max_turns {
        tracing::debug!(kept = max_turns, "history capped by turn count");
        return &history[history.len() - max_turns..];
    }

    let mut total: usize = history.iter().map(HistoryPair::estimated_tokens).sum();
    let mut start = 0;
    while total > max_tokens && start < history.len() {
        total -= history[start].estimated_tokens();
        start += 1;
    }
    if start > 0 {
        tracing::debug!(
            kept = history.len() - start,
            approx_tokens = total,
            "history trimmed to token budget"
        );
    }
    &history[start..]
}

/// Truncate text to at most `max_chars` characters, keeping the head.
///
/// Hard truncation, no word-boundary awareness. Identity when the text
/// is already within the cap; idempotent in general.
pub fn clamp_text(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Keep at most the trailing `max_chars` characters of a text.
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    let len = text.chars().count();
    if len <= max_chars {
        return text;
    }
    let (idx, _) = text
        .char_indices()
        .nth(len - max_chars)
        .expect("offset is within the text");
    &text[idx..]
}

/// Assemble the outbound prompt from (already truncated) history and the
/// new user text.
///
/// The usable context is restricted to the single most recent pair out
/// of a [`CONTEXT_WINDOW_PAIRS`]-pair window: its user and assistant
/// text joined by a space, tail-capped at [`CONTEXT_CHAR_CAP`]
/// characters. With no history the prompt is the user text alone.
pub fn assemble_prompt(history: &[HistoryPair], new_user_text: &str) -> String {
    let window = if history.len() > CONTEXT_WINDOW_PAIRS {
        &history[history.len() - CONTEXT_WINDOW_PAIRS..]
    } else {
        history
    };

    match window.last() {
        Some(pair) => {
            let context = format!("{} {}", pair.user, pair.assistant);
            let context = tail_chars(&context, CONTEXT_CHAR_CAP);
            format!("{context} {new_user_text}")
        }
        None => new_user_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(user: &str, assistant: &str) -> HistoryPair {
        HistoryPair::new(user, assistant)
    }

    #[test]
    fn estimate_rounds_down() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abc"), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcdefg"), 1);
    }

    #[test]
    fn clamp_is_char_boundary_safe() {
        // 'é' is two bytes; a byte-indexed slice at 1 would panic.
        assert_eq!(clamp_text("école", 1), "é");
        assert_eq!(clamp_text("école", 10), "école");
    }

    #[test]
    fn tail_keeps_last_chars() {
        assert_eq!(tail_chars("abcdef", 3), "def");
        assert_eq!(tail_chars("abc", 5), "abc");
        assert_eq!(tail_chars("ééça", 2), "ça");
    }

    #[test]
    fn turn_cap_short_circuits_token_budget() {
        // 11 pairs, each heavy enough to blow a zero token budget; the
        // turn cap fires so the token cap must not be evaluated.
        let history: Vec<_> = (0..11).map(|i| pair(&format!("user {i}"), "a long reply")).collect();
        let kept = truncate_history(&history, 10, 0);
        assert_eq!(kept.len(), 10);
        assert_eq!(kept[0], history[1]);
    }

    #[test]
    fn token_budget_drops_oldest_first() {
        // Each pair is ~4 tokens (8 + 8 chars).
        let history: Vec<_> = (0..4).map(|i| pair(&format!("user {i}00"), "12345678")).collect();
        let kept = truncate_history(&history, 10, 8);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0], history[2]);
    }

    #[test]
    fn prompt_without_history_is_user_text() {
        assert_eq!(assemble_prompt(&[], "hello"), "hello");
    }

    #[test]
    fn prompt_uses_only_most_recent_pair() {
        let history = vec![pair("old q", "old a"), pair("recent q", "recent a")];
        assert_eq!(
            assemble_prompt(&history, "now"),
            "recent q recent a now"
        );
    }

    #[test]
    fn long_context_keeps_trailing_chars() {
        let history = vec![pair(&"x".repeat(300), "tail")];
        let prompt = assemble_prompt(&history, "now");
        // context capped to 200 chars, then " now" appended
        assert_eq!(prompt.chars().count(), 200 + 4);
        assert!(prompt.ends_with("tail now"));
    }
}
