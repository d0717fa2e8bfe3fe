//! Budget formatter: renders each category's survivors as a labeled block.
//!
//! Categories are formatted independently. Text memories share a total
//! character budget spread across however many items survive; skills and
//! preferences use fixed per-field caps.

use chrono::{DateTime, Utc};
use memhook_config::Capabilities;
use memhook_core::memory::{Category, MemoryItem};

use crate::recency::recency_tag;
use crate::text::{char_len, truncate_with_marker};

pub const TEXT_HEADING: &str = "Relevant memories from MemDB:";
pub const SKILL_HEADING: &str = "Relevant skills from MemDB:";
pub const PREFERENCE_HEADING: &str = "User preferences from MemDB:";

const ELLIPSIS: &str = "...";

/// Cap for skill procedures and preference text. Skill descriptions are
/// rendered whole.
pub const FIELD_CHARS: usize = 300;

pub const MAX_SKILL_ITEMS: usize = 2;
pub const MAX_PREFERENCE_ITEMS: usize = 2;

// Rendered lines at or below these lengths carry no content.
const MIN_TEXT_LINE_CHARS: usize = 4;
const MIN_PREFERENCE_LINE_CHARS: usize = 16;

/// Size limits for the text category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBudget {
    /// Characters shared by all rendered items.
    pub total_chars: usize,
    /// Hard ceiling for a single item.
    pub per_item_cap: usize,
    pub max_items: usize,
}

impl Default for TextBudget {
    fn default() -> Self {
        Self {
            total_chars: 3000,
            per_item_cap: 500,
            max_items: 6,
        }
    }
}

impl TextBudget {
    /// Characters each of `count` items may keep.
    ///
    /// Adaptive mode divides the total across the items; otherwise every
    /// item gets the flat per-item cap.
    pub fn per_item_allowance(&self, count: usize, adaptive: bool) -> usize {
        if !adaptive {
            return self.per_item_cap;
        }
        self.per_item_cap.min(self.total_chars / count.max(1))
    }
}

/// A heading plus its rendered lines. Never constructed empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedBlock {
    pub category: Category,
    pub heading: &'static str,
    pub lines: Vec<String>,
}

impl FormattedBlock {
    fn from_lines(category: Category, heading: &'static str, lines: Vec<String>) -> Option<Self> {
        if lines.is_empty() {
            return None;
        }
        Some(Self {
            category,
            heading,
            lines,
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::from(self.heading);
        for line in &self.lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct BudgetFormatter {
    budget: TextBudget,
    adaptive: bool,
}

impl BudgetFormatter {
    pub fn new(budget: TextBudget, adaptive: bool) -> Self {
        Self { budget, adaptive }
    }

    pub fn from_capabilities(capabilities: &Capabilities) -> Self {
        Self::new(TextBudget::default(), capabilities.adaptive_budget)
    }

    /// `- [recency] text` lines for up to `max_items` memories.
    pub fn format_text(&self, items: &[MemoryItem], now: DateTime<Utc>) -> Option<FormattedBlock> {
        let selected = &items[..items.len().min(self.budget.max_items)];
        let allowance = self.budget.per_item_allowance(selected.len(), self.adaptive);

        let lines = selected
            .iter()
            .map(|item| {
                let body = truncate_with_marker(&item.text, allowance, ELLIPSIS);
                match recency_tag(&item.metadata, now) {
                    Some(tag) => format!("- {tag} {body}"),
                    None => format!("- {body}"),
                }
            })
            .filter(|line| char_len(line) > MIN_TEXT_LINE_CHARS)
            .collect();

        FormattedBlock::from_lines(Category::Text, TEXT_HEADING, lines)
    }

    /// `- [Skill: name] description` lines, each with an optional
    /// indented `Procedure:` continuation. Only the procedure is capped.
    pub fn format_skills(&self, items: &[MemoryItem]) -> Option<FormattedBlock> {
        let lines = items
            .iter()
            .take(MAX_SKILL_ITEMS)
            .map(|item| {
                let meta = &item.metadata;
                let description = meta.description.as_deref().unwrap_or(&item.text);
                let mut line = format!("- [Skill: {}] {description}", meta.display_name());
                if let Some(procedure) = meta.procedure.as_deref() {
                    line.push_str("\n  Procedure: ");
                    line.push_str(&truncate_with_marker(procedure, FIELD_CHARS, ELLIPSIS));
                }
                line
            })
            .collect();

        FormattedBlock::from_lines(Category::Skill, SKILL_HEADING, lines)
    }

    pub fn format_preferences(&self, items: &[MemoryItem]) -> Option<FormattedBlock> {
        let lines = items
            .iter()
            .take(MAX_PREFERENCE_ITEMS)
            .map(|item| {
                format!(
                    "- [Preference] {}",
                    truncate_with_marker(&item.text, FIELD_CHARS, ELLIPSIS)
                )
            })
            .filter(|line| char_len(line) > MIN_PREFERENCE_LINE_CHARS)
            .collect();

        FormattedBlock::from_lines(Category::Preference, PREFERENCE_HEADING, lines)
    }
}
