//! Shared test helpers for pipeline tests.

use std::sync::Mutex;
use std::time::Duration;

use memhook_core::error::StoreError;
use memhook_core::memory::{MemoryGroup, MemoryItem};
use memhook_core::store::{CompletionRequest, MemoryStore, SearchRequest, SearchResponse};

/// A store that answers every search with one scripted result and every
/// completion with another, recording the requests it saw.
///
/// Panics if a completion is requested without one being scripted.
pub struct ScriptedStore {
    search: Result<SearchResponse, StoreError>,
    completion: Option<Result<String, StoreError>>,
    search_calls: Mutex<Vec<SearchRequest>>,
    complete_calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedStore {
    pub fn new(search: Result<SearchResponse, StoreError>) -> Self {
        Self {
            search,
            completion: None,
            search_calls: Mutex::new(Vec::new()),
            complete_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_completion(mut self, completion: Result<String, StoreError>) -> Self {
        self.completion = Some(completion);
        self
    }

    pub fn search_calls(&self) -> Vec<SearchRequest> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn complete_calls(&self) -> Vec<CompletionRequest> {
        self.complete_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MemoryStore for ScriptedStore {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(
        &self,
        request: SearchRequest,
        _timeout: Duration,
    ) -> Result<SearchResponse, StoreError> {
        self.search_calls.lock().unwrap().push(request);
        self.search.clone()
    }

    async fn complete(
        &self,
        request: CompletionRequest,
        _timeout: Duration,
    ) -> Result<String, StoreError> {
        self.complete_calls.lock().unwrap().push(request);
        self.completion
            .clone()
            .expect("ScriptedStore: completion requested but none scripted")
    }

    async fn health(&self, _timeout: Duration) -> Result<(), StoreError> {
        Ok(())
    }
}

/// `count` items with text `"{prefix} {i}"`.
pub fn memories(prefix: &str, count: usize) -> Vec<MemoryItem> {
    (0..count)
        .map(|i| MemoryItem::new(format!("{prefix} {i}")))
        .collect()
}

/// A response with one group per non-empty category.
pub fn search_response(
    text: &[MemoryItem],
    skill: &[MemoryItem],
    preference: &[MemoryItem],
) -> SearchResponse {
    let group = |items: &[MemoryItem]| {
        if items.is_empty() {
            Vec::new()
        } else {
            vec![MemoryGroup::new(items.to_vec())]
        }
    };
    SearchResponse {
        text_mem: group(text),
        skill_mem: group(skill),
        pref_mem: group(preference),
    }
}
