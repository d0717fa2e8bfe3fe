//! Memory items: records returned by the memory store for a single query.
//!
//! Store payloads vary between deployments: the primary text may live in
//! `memory`, `content` or `memory_content`, and metadata may be nested under
//! `metadata` or sit on the item itself. Items are therefore decoded
//! leniently from raw JSON instead of failing the whole response.

use serde::Deserialize;
use serde_json::Value;

/// Fields checked, in order, for an item's primary text.
const TEXT_FIELDS: [&str; 3] = ["memory", "content", "memory_content"];

/// The response bucket an item arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// General episodic/factual memories (`text_mem`)
    Text,
    /// Procedural memories with a name and optional procedure (`skill_mem`)
    Skill,
    /// Standing user preferences (`pref_mem`)
    Preference,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Skill => "skill",
            Self::Preference => "preference",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A timestamp exactly as the store sent it. Interpretation is left to the
/// formatter, which treats anything unparseable as "unknown".
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    Text(String),
    Epoch(f64),
}

/// Optional metadata attached to a memory item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryMetadata {
    pub updated_at: Option<RawTimestamp>,
    pub created_at: Option<RawTimestamp>,
    pub name: Option<String>,
    pub key: Option<String>,
    pub description: Option<String>,
    pub procedure: Option<String>,
}

impl MemoryMetadata {
    /// The most recent known timestamp: `updated_at`, else `created_at`.
    pub fn timestamp(&self) -> Option<&RawTimestamp> {
        self.updated_at.as_ref().or(self.created_at.as_ref())
    }

    /// Skill label: `name`, else `key`, else `"unnamed"`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.key.as_deref())
            .unwrap_or("unnamed")
    }

    fn from_object(obj: &Value) -> Self {
        Self {
            updated_at: timestamp_field(obj, "updated_at"),
            created_at: timestamp_field(obj, "created_at"),
            name: string_field(obj, "name"),
            key: string_field(obj, "key"),
            description: string_field(obj, "description"),
            procedure: string_field(obj, "procedure"),
        }
    }
}

/// A single retrieved memory. Immutable once decoded.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct MemoryItem {
    /// Primary text; empty when the store sent none.
    pub text: String,
    pub metadata: MemoryMetadata,
}

impl MemoryItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: MemoryMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: MemoryMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Decode an item from its raw JSON form.
    ///
    /// Metadata is read from the nested `metadata` object when present,
    /// otherwise from the item's own fields.
    pub fn from_value(value: &Value) -> Self {
        let text = TEXT_FIELDS
            .iter()
            .find_map(|field| string_field(value, field))
            .unwrap_or_default();

        let meta_source = match value.get("metadata") {
            Some(meta) if !meta.is_null() => meta,
            _ => value,
        };

        Self {
            text,
            metadata: MemoryMetadata::from_object(meta_source),
        }
    }
}

impl From<Value> for MemoryItem {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

/// One grouping container in a response bucket (typically one per cube).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryGroup {
    #[serde(default)]
    pub memories: Option<Vec<MemoryItem>>,
}

impl MemoryGroup {
    pub fn new(memories: Vec<MemoryItem>) -> Self {
        Self {
            memories: Some(memories),
        }
    }
}

fn string_field(obj: &Value, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn timestamp_field(obj: &Value, key: &str) -> Option<RawTimestamp> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(RawTimestamp::Text(s.clone())),
        Value::Number(n) => n
            .as_f64()
            .filter(|v| *v != 0.0)
            .map(RawTimestamp::Epoch),
        _ => None,
    }
}
