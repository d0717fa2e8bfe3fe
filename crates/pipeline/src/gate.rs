//! Query gate: decides whether a prompt is worth a memory lookup.
//!
//! Every accepted prompt costs at least one network round trip, so short
//! prompts and casual chatter (greetings, thanks, yes/no, bare slash
//! commands) are turned away before anything else runs.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Prompts shorter than this (after trimming) are never looked up.
pub const MIN_PROMPT_CHARS: usize = 5;

/// Matched against the trimmed, lowercased prompt.
static CASUAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(hi|hello|hey|ok|yes|no|thanks|спасибо|привет|ок|да|нет|ладно|понял|хорошо|/\w+)\s*[.!?]*$",
    )
    .expect("valid casual prompt pattern")
});

/// True when the prompt should trigger retrieval.
pub fn should_query(prompt: &str) -> bool {
    let trimmed = prompt.trim();
    if trimmed.chars().count() < MIN_PROMPT_CHARS {
        return false;
    }
    !CASUAL.is_match(&trimmed.to_lowercase())
}
