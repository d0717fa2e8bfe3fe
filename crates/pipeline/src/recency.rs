//! Recency tags for memory lines: `[<1h ago]`, `[5h ago]`, `[3d ago]`,
//! `[Jan 15]`.
//!
//! Timestamps that cannot be interpreted produce no tag. Calendar labels are
//! rendered in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use memhook_core::memory::{MemoryMetadata, RawTimestamp};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Ages below this many days render as `Nd ago`; older ones as a date.
const RELATIVE_DAYS: i64 = 14;

/// The bracketed recency tag for an item, if its timestamp is usable.
pub fn recency_tag(metadata: &MemoryMetadata, now: DateTime<Utc>) -> Option<String> {
    let at = parse_timestamp(metadata.timestamp()?)?;
    let hours = (now - at).num_hours();

    let label = if hours < 1 {
        "<1h ago".to_string()
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if hours / 24 < RELATIVE_DAYS {
        format!("{}d ago", hours / 24)
    } else {
        at.format("%b %-d").to_string()
    };
    Some(format!("[{label}]"))
}

/// Interpret a raw store timestamp. Numbers are epoch milliseconds; strings
/// may be RFC 3339, RFC 2822, a zone-less date-time (taken as UTC) or a
/// bare date.
pub fn parse_timestamp(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Epoch(millis) if millis.is_finite() => {
            DateTime::from_timestamp_millis(*millis as i64)
        }
        RawTimestamp::Epoch(_) => None,
        RawTimestamp::Text(text) => parse_text(text.trim()),
    }
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_rfc2822(text) {
        return Some(at.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
