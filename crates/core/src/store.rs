//! MemoryStore trait: the abstraction over the external memory service.
//!
//! The store exposes three calls the pipeline relies on: a multi-category
//! search, a free-text completion (used for relevance judgment), and a
//! liveness check. Every call takes an explicit timeout; the caller decides
//! how long each stage may wait.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::memory::{Category, MemoryGroup, MemoryItem};

/// Which memory space(s) a request addresses, and under which field name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CubeTarget {
    /// `"readable_cube_ids": [..]`
    #[serde(rename = "readable_cube_ids")]
    Readable(Vec<String>),
    /// `"mem_cube_id": ".."`
    #[serde(rename = "mem_cube_id")]
    Single(String),
}

/// Body of a search request.
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    pub query: String,
    pub user_id: String,
    #[serde(flatten)]
    pub cube: CubeTarget,
    pub top_k: usize,
    pub include_skill_memory: bool,
    pub skill_mem_top_k: usize,
    pub include_preference: bool,
    /// Diversity instruction, e.g. `"mmr"`
    pub dedup: String,
    pub internet_search: bool,
}

/// Search results split by bucket. Each bucket holds grouping containers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub text_mem: Vec<MemoryGroup>,
    #[serde(default)]
    pub skill_mem: Vec<MemoryGroup>,
    #[serde(default)]
    pub pref_mem: Vec<MemoryGroup>,
}

impl SearchResponse {
    /// All items of one category, flattened across groups in response order.
    pub fn flatten(&self, category: Category) -> Vec<MemoryItem> {
        let groups = match category {
            Category::Text => &self.text_mem,
            Category::Skill => &self.skill_mem,
            Category::Preference => &self.pref_mem,
        };
        groups
            .iter()
            .filter_map(|g| g.memories.as_ref())
            .flatten()
            .cloned()
            .collect()
    }
}

/// Body of a completion request.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub user_id: String,
    #[serde(flatten)]
    pub cube: CubeTarget,
    /// The full prompt text sent to the store's model
    pub query: String,
    pub top_k: usize,
    pub include_preference: bool,
    pub add_message_on_answer: bool,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// The core MemoryStore trait.
///
/// Implementations: HTTP (production), scripted stores in tests.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// The store name, for logs.
    fn name(&self) -> &str;

    /// Run one multi-category search.
    async fn search(
        &self,
        request: SearchRequest,
        timeout: Duration,
    ) -> std::result::Result<SearchResponse, StoreError>;

    /// Run one completion and return the model's free-text answer.
    async fn complete(
        &self,
        request: CompletionRequest,
        timeout: Duration,
    ) -> std::result::Result<String, StoreError>;

    /// Check that the store is reachable and healthy.
    async fn health(&self, timeout: Duration) -> std::result::Result<(), StoreError>;
}
