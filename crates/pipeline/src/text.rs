//! Character-based text helpers.
//!
//! All limits in the pipeline count Unicode scalar values, never bytes, so
//! a cut never lands inside a multi-byte character.

use std::borrow::Cow;

/// Number of characters in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `max_chars` characters of `text`.
pub fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Cut `text` to `max_chars` characters and append `marker` when anything
/// was removed. Text that already fits is returned untouched.
pub fn truncate_with_marker<'a>(text: &'a str, max_chars: usize, marker: &str) -> Cow<'a, str> {
    let head = take_chars(text, max_chars);
    if head.len() == text.len() {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(format!("{head}{marker}"))
    }
}
