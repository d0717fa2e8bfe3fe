//! Category retriever: one over-fetching search, split into candidates.
//!
//! The text category is left unbounded here; its cap is applied after the
//! relevance filter. Skill and preference candidates are capped immediately.

use std::time::Duration;

use memhook_config::HookConfig;
use memhook_core::memory::{Category, MemoryItem};
use memhook_core::store::{MemoryStore, SearchRequest};
use tracing::{debug, warn};

use crate::format::{MAX_PREFERENCE_ITEMS, MAX_SKILL_ITEMS};
use crate::text::take_chars;

pub const RETRIEVAL_TIMEOUT: Duration = Duration::from_secs(8);

/// Longest query sent to the store.
pub const QUERY_CHARS: usize = 500;

/// Over-fetch size when the relevance filter will prune the results.
pub const FETCH_K_FILTERED: usize = 12;

/// Fetch size when results go straight to truncation.
pub const FETCH_K_UNFILTERED: usize = 8;

pub const SKILL_TOP_K: usize = 3;

const DEDUP_MODE: &str = "mmr";

/// Retrieved candidates, one ordered list per category.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    pub text: Vec<MemoryItem>,
    pub skill: Vec<MemoryItem>,
    pub preference: Vec<MemoryItem>,
}

impl Candidates {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.skill.is_empty() && self.preference.is_empty()
    }
}

/// Build the search body for a gate-passed prompt.
pub fn search_request(config: &HookConfig, prompt: &str) -> SearchRequest {
    let caps = &config.capabilities;
    SearchRequest {
        query: take_chars(prompt, QUERY_CHARS).to_string(),
        user_id: config.user_id.clone(),
        cube: config.cube_target(),
        top_k: if caps.rerank_enabled {
            FETCH_K_FILTERED
        } else {
            FETCH_K_UNFILTERED
        },
        include_skill_memory: caps.include_skill,
        skill_mem_top_k: SKILL_TOP_K,
        include_preference: caps.include_preference,
        dedup: DEDUP_MODE.into(),
        internet_search: true,
    }
}

/// Search the store and split the answer into candidates.
///
/// Returns `None` when the search fails or every category comes back empty.
pub async fn retrieve(
    store: &dyn MemoryStore,
    config: &HookConfig,
    prompt: &str,
) -> Option<Candidates> {
    let request = search_request(config, prompt);
    let response = match store.search(request, RETRIEVAL_TIMEOUT).await {
        Ok(response) => response,
        Err(e) => {
            warn!(store = store.name(), error = %e, "Memory search failed, skipping injection");
            return None;
        }
    };

    let caps = &config.capabilities;
    let mut candidates = Candidates {
        text: response.flatten(Category::Text),
        ..Candidates::default()
    };
    if caps.include_skill {
        candidates.skill = response.flatten(Category::Skill);
        candidates.skill.truncate(MAX_SKILL_ITEMS);
    }
    if caps.include_preference {
        candidates.preference = response.flatten(Category::Preference);
        candidates.preference.truncate(MAX_PREFERENCE_ITEMS);
    }

    debug!(
        text = candidates.text.len(),
        skill = candidates.skill.len(),
        preference = candidates.preference.len(),
        "Retrieved candidates"
    );

    if candidates.is_empty() {
        return None;
    }
    Some(candidates)
}
