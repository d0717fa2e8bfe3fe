//! Tolerant extraction of JSON arrays embedded in model output.
//!
//! Models asked for "a JSON array" often wrap it in prose, leave trailing
//! commas, or emit typographic quotes. [`extract_json_array`] locates the
//! shortest bracketed span, parses it, and retries once after repairing
//! those two defects. It never fails loudly: `None` means "no usable array".

use std::sync::LazyLock;

use regex_lite::Regex;
use serde_json::Value;

/// First `[` to the nearest following `]`: fits flat index lists.
static ARRAY_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[\s\S]*?\]").expect("valid array pattern"));

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid trailing comma pattern"));

/// Find and parse the JSON array embedded in `text`.
///
/// Returns the parsed value only when it is an array.
pub fn extract_json_array(text: &str) -> Option<Value> {
    let span = ARRAY_SPAN.find(text)?.as_str();

    let parsed = serde_json::from_str::<Value>(span)
        .ok()
        .or_else(|| serde_json::from_str::<Value>(&repair(span)).ok())?;

    match parsed {
        Value::Array(_) => Some(parsed),
        _ => None,
    }
}

/// Drop trailing commas and normalise curly double quotes.
fn repair(span: &str) -> String {
    let without_commas = TRAILING_COMMA.replace_all(span, "$1");
    without_commas.replace(['\u{201C}', '\u{201D}'], "\"")
}
