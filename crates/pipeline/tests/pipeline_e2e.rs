//! End-to-end tests for the injection pipeline.
//!
//! These drive `InjectionPipeline` from prompt to wrapped context against a
//! scripted store, covering gating, capping, relevance filtering and its
//! fallbacks.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use memhook_config::{Capabilities, HookConfig};
use memhook_core::error::StoreError;
use memhook_core::memory::{MemoryGroup, MemoryItem, MemoryMetadata, RawTimestamp};
use memhook_core::store::{CompletionRequest, MemoryStore, SearchRequest, SearchResponse};
use memhook_pipeline::{InjectionPipeline, Outcome};
use serde_json::json;

const PROMPT: &str = "What did we decide about the caching layer?";

// ── Scripted store ───────────────────────────────────────────────────────

struct ScriptedStore {
    search: Result<SearchResponse, StoreError>,
    completion: Option<Result<String, StoreError>>,
    searches: Mutex<Vec<SearchRequest>>,
    completions: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedStore {
    fn returning(search: SearchResponse) -> Self {
        Self {
            search: Ok(search),
            completion: None,
            searches: Mutex::new(Vec::new()),
            completions: Mutex::new(Vec::new()),
        }
    }

    fn judging(mut self, completion: Result<String, StoreError>) -> Self {
        self.completion = Some(completion);
        self
    }

    fn network_calls(&self) -> usize {
        self.searches.lock().unwrap().len() + self.completions.lock().unwrap().len()
    }

    fn judgment_calls(&self) -> usize {
        self.completions.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl MemoryStore for ScriptedStore {
    fn name(&self) -> &str {
        "e2e_scripted"
    }

    async fn search(
        &self,
        request: SearchRequest,
        _timeout: Duration,
    ) -> Result<SearchResponse, StoreError> {
        self.searches.lock().unwrap().push(request);
        self.search.clone()
    }

    async fn complete(
        &self,
        request: CompletionRequest,
        _timeout: Duration,
    ) -> Result<String, StoreError> {
        self.completions.lock().unwrap().push(request);
        match &self.completion {
            Some(result) => result.clone(),
            None => panic!("ScriptedStore: unexpected judgment call"),
        }
    }

    async fn health(&self, _timeout: Duration) -> Result<(), StoreError> {
        Ok(())
    }
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

fn items(prefix: &str, count: usize) -> Vec<MemoryItem> {
    (0..count)
        .map(|i| MemoryItem::new(format!("{prefix} number {i}")))
        .collect()
}

fn response(text: Vec<MemoryItem>, skill: Vec<MemoryItem>, pref: Vec<MemoryItem>) -> SearchResponse {
    SearchResponse {
        text_mem: vec![MemoryGroup::new(text)],
        skill_mem: vec![MemoryGroup::new(skill)],
        pref_mem: vec![MemoryGroup::new(pref)],
    }
}

fn setup(store: ScriptedStore, rerank: bool) -> (Arc<ScriptedStore>, InjectionPipeline) {
    let store = Arc::new(store);
    let config = HookConfig {
        capabilities: Capabilities {
            rerank_enabled: rerank,
            ..Capabilities::default()
        },
        ..HookConfig::default()
    };
    (store.clone(), InjectionPipeline::new(store, config))
}

async fn context(pipeline: &InjectionPipeline) -> String {
    match pipeline.run_at(PROMPT, now()).await {
        Outcome::Injected(context) => context,
        other => panic!("expected injected context, got {other:?}"),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn long_text_items_and_one_skill() {
    let text = (0..4).map(|_| MemoryItem::new("c".repeat(1000))).collect();
    let skill = vec![MemoryItem::new("Invalidate the CDN after deploys")];
    let (store, pipeline) = setup(ScriptedStore::returning(response(text, skill, vec![])), false);

    let context = context(&pipeline).await;
    let line = format!("- {}...", "c".repeat(500));
    let expected = format!(
        "<user_memory_context>\nRelevant memories from MemDB:\n{line}\n{line}\n{line}\n{line}\n\n\
         Relevant skills from MemDB:\n- [Skill: unnamed] Invalidate the CDN after deploys\n\
         </user_memory_context>"
    );
    assert_eq!(context, expected);
    assert!(!context.contains("User preferences"));
    assert_eq!(store.judgment_calls(), 0);
}

#[tokio::test]
async fn casual_prompt_makes_no_network_calls() {
    let (store, pipeline) = setup(
        ScriptedStore::returning(response(items("fact", 3), vec![], vec![])),
        true,
    );
    assert_eq!(pipeline.run("ok").await, Outcome::Skipped);
    assert_eq!(pipeline.run("Thanks!").await, Outcome::Skipped);
    assert_eq!(store.network_calls(), 0);
}

#[tokio::test]
async fn surfaced_counts_respect_category_caps() {
    let search = response(items("fact", 10), items("skill", 5), items("preference", 5));
    let (_, pipeline) = setup(ScriptedStore::returning(search), false);

    let context = context(&pipeline).await;
    assert_eq!(context.matches("- fact number").count(), 6);
    assert_eq!(context.matches("- [Skill:").count(), 2);
    assert_eq!(context.matches("- [Preference]").count(), 2);
    assert!(!context.contains("fact number 6"));
}

#[tokio::test]
async fn empty_verdict_suppresses_text_only() {
    let search = response(items("fact", 5), vec![], items("preference", 1));
    let (store, pipeline) = setup(ScriptedStore::returning(search).judging(Ok("[]".into())), true);

    let context = context(&pipeline).await;
    assert!(!context.contains("Relevant memories"));
    assert!(context.contains("User preferences from MemDB:\n- [Preference] preference number 0"));
    assert_eq!(store.judgment_calls(), 1);
}

#[tokio::test]
async fn failed_judgment_matches_unfiltered_output() {
    let search = response(items("fact", 9), items("skill", 1), vec![]);

    let (_, unfiltered) = setup(ScriptedStore::returning(search.clone()), false);
    let baseline = context(&unfiltered).await;

    for failure in [
        Err(StoreError::Timeout { timeout_ms: 10_000 }),
        Err(StoreError::Status {
            status_code: 500,
            body: "internal error".into(),
        }),
        Ok("I could not decide.".to_string()),
        Ok("{\"relevant\": 1}".to_string()),
    ] {
        let (store, filtered) = setup(ScriptedStore::returning(search.clone()).judging(failure), true);
        assert_eq!(context(&filtered).await, baseline);
        assert_eq!(store.judgment_calls(), 1);
    }
}

#[tokio::test]
async fn verdict_keeps_original_order() {
    let search = response(items("fact", 5), vec![], vec![]);
    let (_, pipeline) = setup(
        ScriptedStore::returning(search).judging(Ok("Relevant: [\"4\", 1, 4, 17]".into())),
        true,
    );

    let context = context(&pipeline).await;
    assert_eq!(
        context,
        "<user_memory_context>\nRelevant memories from MemDB:\n\
         - fact number 1\n- fact number 4\n</user_memory_context>"
    );
}

#[tokio::test]
async fn two_candidates_skip_judgment() {
    let search = response(items("fact", 2), vec![], vec![]);
    let (store, pipeline) = setup(ScriptedStore::returning(search), true);

    let context = context(&pipeline).await;
    assert!(context.contains("- fact number 0\n- fact number 1"));
    assert_eq!(store.judgment_calls(), 0);
}

#[tokio::test]
async fn decoded_store_payload_renders_metadata() {
    let search: SearchResponse = serde_json::from_value(json!({
        "text_mem": [
            {"cube_id": "memos", "memories": [
                {"memory": "Redis replaced memcached", "metadata": {"updated_at": "2026-10-19T07:00:00Z"}},
                {"content": "Cache keys are namespaced per tenant", "created_at": "2026-09-01T00:00:00Z"}
            ]},
            {"cube_id": "other", "memories": null}
        ],
        "skill_mem": [
            {"memories": [{"memory": "", "metadata": {"name": "flush-cache", "description": "Flush all tiers", "procedure": "1. drain 2. flush"}}]}
        ]
    }))
    .unwrap();

    let (_, pipeline) = setup(ScriptedStore::returning(search), false);
    let context = context(&pipeline).await;
    assert_eq!(
        context,
        "<user_memory_context>\n\
         Relevant memories from MemDB:\n\
         - [5h ago] Redis replaced memcached\n\
         - [Sep 1] Cache keys are namespaced per tenant\n\n\
         Relevant skills from MemDB:\n\
         - [Skill: flush-cache] Flush all tiers\n  Procedure: 1. drain 2. flush\n\
         </user_memory_context>"
    );
}

#[tokio::test]
async fn nothing_retrieved_produces_no_output() {
    let (_, pipeline) = setup(ScriptedStore::returning(SearchResponse::default()), true);
    let outcome = pipeline.run_at(PROMPT, now()).await;
    assert_eq!(outcome, Outcome::NoCandidates);
    assert_eq!(outcome.into_context(), None);
}

#[tokio::test]
async fn adaptive_budget_off_uses_flat_cap() {
    let text = (0..8).map(|_| MemoryItem::new("z".repeat(700))).collect();
    let store = Arc::new(ScriptedStore::returning(response(text, vec![], vec![])));
    let config = HookConfig {
        capabilities: Capabilities {
            adaptive_budget: false,
            ..Capabilities::default()
        },
        ..HookConfig::default()
    };
    let pipeline = InjectionPipeline::new(store, config);

    let context = context(&pipeline).await;
    assert_eq!(context.matches(&format!("- {}...", "z".repeat(500))).count(), 6);
}

#[tokio::test]
async fn epoch_timestamps_are_milliseconds() {
    let stamped = MemoryItem::new("Switched the session store to Redis").with_metadata(MemoryMetadata {
        updated_at: Some(RawTimestamp::Epoch((now().timestamp_millis() - 3 * 86_400_000) as f64)),
        ..MemoryMetadata::default()
    });
    let (_, pipeline) = setup(
        ScriptedStore::returning(response(vec![stamped], vec![], vec![])),
        false,
    );
    assert!(context(&pipeline).await.contains("- [3d ago] Switched the session store to Redis"));
}
