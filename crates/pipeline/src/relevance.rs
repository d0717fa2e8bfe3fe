//! Relevance filter: a remote judgment that prunes off-topic text memories.
//!
//! The store's model is shown the query and numbered snippets and asked for
//! a JSON array of relevant positions. Failure of any kind keeps every
//! candidate; a well-formed verdict keeps only the named positions, in their
//! original order. A valid empty verdict keeps nothing.

use std::collections::BTreeSet;
use std::time::Duration;

use memhook_config::HookConfig;
use memhook_core::memory::MemoryItem;
use memhook_core::store::{CompletionRequest, MemoryStore};
use serde_json::Value;
use tracing::{debug, warn};

use crate::json_extract::extract_json_array;
use crate::text::{take_chars, truncate_with_marker};

pub const JUDGMENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Below this many candidates the judgment is not worth a round trip.
pub const MIN_CANDIDATES: usize = 3;

pub const SNIPPET_CHARS: usize = 300;
pub const QUERY_CHARS: usize = 300;
pub const MAX_TOKENS: u32 = 50;

/// Outcome of one relevance judgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Keep exactly these positions (valid, deduplicated, possibly empty).
    Keep(BTreeSet<usize>),
    /// The judgment was unusable: keep everything.
    Fallback,
}

impl Verdict {
    /// Apply the verdict, preserving the candidates' original order.
    pub fn apply(&self, candidates: Vec<MemoryItem>) -> Vec<MemoryItem> {
        match self {
            Self::Fallback => candidates,
            Self::Keep(keep) => candidates
                .into_iter()
                .enumerate()
                .filter(|(i, _)| keep.contains(i))
                .map(|(_, item)| item)
                .collect(),
        }
    }
}

/// The instruction sent to the judge.
pub fn judgment_prompt(query: &str, candidates: &[MemoryItem]) -> String {
    let snippets: Vec<String> = candidates
        .iter()
        .enumerate()
        .map(|(i, item)| format!("[{i}] {}", truncate_with_marker(&item.text, SNIPPET_CHARS, "…")))
        .collect();

    format!(
        "You are a relevance judge. Given a user query and memory snippets from a personal \
knowledge base, return ONLY the indices of memories that are relevant to the query.

RELEVANT = directly relates to the query topic, contains useful info
NOT RELEVANT = different topic, only shares a keyword, generic/unrelated

Query: \"{query}\"

Memories:
{}

Return a JSON array of relevant indices. Example: [0, 2, 5]
If none are relevant, return: []",
        snippets.join("\n")
    )
}

/// Interpret the judge's free-text answer for `count` candidates.
pub fn parse_verdict(response: &str, count: usize) -> Verdict {
    let Some(Value::Array(entries)) = extract_json_array(response) else {
        return Verdict::Fallback;
    };

    let keep = entries
        .iter()
        .filter_map(coerce_index)
        .filter(|i| *i < count)
        .collect();
    Verdict::Keep(keep)
}

/// Run the judgment over the text candidates when it is worthwhile.
pub async fn filter_relevant(
    store: &dyn MemoryStore,
    config: &HookConfig,
    prompt: &str,
    candidates: Vec<MemoryItem>,
) -> Vec<MemoryItem> {
    if candidates.len() < MIN_CANDIDATES {
        debug!(count = candidates.len(), "Too few candidates, skipping relevance judgment");
        return candidates;
    }

    let query = take_chars(prompt, QUERY_CHARS);
    let request = CompletionRequest {
        user_id: config.user_id.clone(),
        cube: config.cube_target(),
        query: judgment_prompt(query, &candidates),
        top_k: 1,
        include_preference: false,
        add_message_on_answer: false,
        max_tokens: MAX_TOKENS,
        temperature: 0.0,
    };

    let verdict = match store.complete(request, JUDGMENT_TIMEOUT).await {
        Ok(response) => parse_verdict(&response, candidates.len()),
        Err(e) => {
            warn!(store = store.name(), error = %e, "Relevance judgment failed, keeping all candidates");
            Verdict::Fallback
        }
    };

    match &verdict {
        Verdict::Keep(keep) => {
            debug!(kept = keep.len(), total = candidates.len(), "Relevance judgment applied")
        }
        Verdict::Fallback => debug!("Relevance judgment unusable, keeping all candidates"),
    }
    verdict.apply(candidates)
}

/// Integer index from a JSON number or a numeric string.
///
/// Strings use their leading integer (`"2"`, `" 3 "`, `"4th"`); negative and
/// fractional values are rejected.
fn coerce_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_u64() {
                return usize::try_from(i).ok();
            }
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as usize)
        }
        Value::String(s) => leading_int(s).and_then(|i| usize::try_from(i).ok()),
        _ => None,
    }
}

fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
