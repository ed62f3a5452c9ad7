//! Tests for the context budget manager: truncation caps, clamping,
//! and prompt assembly.

use huginn::HistoryPair;
use huginn::budget::{
    CONTEXT_CHAR_CAP, assemble_prompt, clamp_text, estimate_tokens, truncate_history,
};

fn pairs(n: usize, user_len: usize, assistant_len: usize) -> Vec<HistoryPair> {
    (0..n)
        .map(|i| {
            HistoryPair::new(
                format!("{i:>width$}", width = user_len),
                "a".repeat(assistant_len),
            )
        })
        .collect()
}

// =========================================================================
// truncate_history
// =========================================================================

#[test]
fn short_history_is_untouched() {
    let history = pairs(4, 8, 8);
    let kept = truncate_history(&history, 10, 800);
    assert_eq!(kept, &history[..]);
}

#[test]
fn turn_cap_keeps_most_recent() {
    let history = pairs(15, 8, 8);
    let kept = truncate_history(&history, 10, 800);
    assert_eq!(kept.len(), 10);
    assert_eq!(kept[0], history[5]);
    assert_eq!(kept[9], history[14]);
}

#[test]
fn turn_cap_short_circuits_token_budget() {
    // Over the turn cap AND over any token budget: only the turn cap
    // may fire, so 10 pairs survive even with a budget of zero.
    let history = pairs(15, 100, 100);
    let kept = truncate_history(&history, 10, 0);
    assert_eq!(kept.len(), 10);
}

#[test]
fn token_budget_drops_oldest_pairs() {
    // 4 pairs at (8 + 8) chars = 4 approx tokens each.
    let history = pairs(4, 8, 8);
    let kept = truncate_history(&history, 10, 9);
    assert_eq!(kept.len(), 2);
    assert_eq!(kept[0], history[2]);
    assert_eq!(kept[1], history[3]);
}

#[test]
fn token_budget_can_empty_the_history() {
    let history = pairs(3, 400, 400);
    let kept = truncate_history(&history, 10, 1);
    assert!(kept.is_empty());
}

#[test]
fn truncation_never_reorders() {
    let history = pairs(8, 40, 40);
    let kept = truncate_history(&history, 6, 30);
    for window in kept.windows(2) {
        let a = history.iter().position(|p| p == &window[0]).unwrap();
        let b = history.iter().position(|p| p == &window[1]).unwrap();
        assert!(a < b);
    }
}

#[test]
fn token_trim_is_idempotent() {
    // Within the turn cap but far over the token budget: the first
    // application trims to the budget, the second changes nothing.
    let history = pairs(9, 60, 60);
    let once = truncate_history(&history, 10, 50).to_vec();
    assert!(once.len() < history.len());
    let twice = truncate_history(&once, 10, 50);
    assert_eq!(twice, &once[..]);
}

// =========================================================================
// clamp_text / estimate_tokens
// =========================================================================

#[test]
fn clamp_is_identity_under_cap() {
    assert_eq!(clamp_text("hello", 5), "hello");
    assert_eq!(clamp_text("hello", 512), "hello");
}

#[test]
fn clamp_truncates_hard() {
    assert_eq!(clamp_text("hello world", 5), "hello");
}

#[test]
fn clamp_is_idempotent() {
    for s in ["", "short", "a much longer string with several words"] {
        for n in [0usize, 1, 7, 100] {
            let once = clamp_text(s, n);
            assert_eq!(clamp_text(once, n), once);
        }
    }
}

#[test]
fn clamp_counts_chars_not_bytes() {
    let s = "àéîõü-plus-ascii";
    assert_eq!(clamp_text(s, 5), "àéîõü");
}

#[test]
fn estimate_is_chars_over_four() {
    assert_eq!(estimate_tokens("12345678"), 2);
    assert_eq!(estimate_tokens("123456789"), 2);
}

// =========================================================================
// assemble_prompt
// =========================================================================

#[test]
fn no_history_yields_bare_input() {
    assert_eq!(assemble_prompt(&[], "what is a raven?"), "what is a raven?");
}

#[test]
fn context_is_most_recent_pair_only() {
    let history = vec![
        HistoryPair::new("first q", "first a"),
        HistoryPair::new("second q", "second a"),
        HistoryPair::new("third q", "third a"),
        HistoryPair::new("fourth q", "fourth a"),
    ];
    assert_eq!(
        assemble_prompt(&history, "next"),
        "fourth q fourth a next"
    );
}

#[test]
fn oversized_context_keeps_its_tail() {
    let history = vec![HistoryPair::new("q".repeat(250), "ending")];
    let prompt = assemble_prompt(&history, "next");
    let context_len = prompt.chars().count() - " next".chars().count();
    assert_eq!(context_len, CONTEXT_CHAR_CAP);
    assert!(prompt.ends_with("ending next"));
}
