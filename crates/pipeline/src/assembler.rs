//! Injection assembler: wraps formatted blocks into the context payload.

use memhook_core::memory::Category;

use crate::format::FormattedBlock;

pub const CONTEXT_OPEN: &str = "<user_memory_context>";
pub const CONTEXT_CLOSE: &str = "</user_memory_context>";

const BLOCK_SEPARATOR: &str = "\n\n";

fn rank(category: Category) -> u8 {
    match category {
        Category::Text => 0,
        Category::Skill => 1,
        Category::Preference => 2,
    }
}

/// Join blocks in text → skill → preference order and wrap them in the
/// context markers. Returns `None` when there is nothing to inject.
pub fn assemble(mut blocks: Vec<FormattedBlock>) -> Option<String> {
    blocks.retain(|block| !block.lines.is_empty());
    if blocks.is_empty() {
        return None;
    }
    blocks.sort_by_key(|block| rank(block.category));

    let body = blocks
        .iter()
        .map(FormattedBlock::render)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR);
    Some(format!("{CONTEXT_OPEN}\n{body}\n{CONTEXT_CLOSE}"))
}
