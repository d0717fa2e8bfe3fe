//! HTTP memory store client.
//!
//! Talks to a MemOS-compatible REST API:
//! - `POST /product/search`: multi-category memory search
//! - `POST /product/chat/complete`: free-text completion
//! - `GET /product/scheduler/allstatus`: liveness
//!
//! Each call runs under the caller's timeout; when it elapses the in-flight
//! request is dropped and reported as [`StoreError::Timeout`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use memhook_config::HookConfig;
use memhook_core::error::StoreError;
use memhook_core::memory::MemoryGroup;
use memhook_core::store::{CompletionRequest, MemoryStore, SearchRequest, SearchResponse};
use serde::Deserialize;
use tracing::{debug, warn};

/// Header carrying the optional shared secret.
pub const SECRET_HEADER: &str = "X-Internal-Service";

const SEARCH_PATH: &str = "/product/search";
const COMPLETE_PATH: &str = "/product/chat/complete";
const HEALTH_PATH: &str = "/product/scheduler/allstatus";

/// Longest error body kept for logs.
const ERROR_BODY_LIMIT: usize = 200;

/// A memory store reached over HTTP.
pub struct HttpMemoryStore {
    base_url: String,
    secret: Option<String>,
    client: reqwest::Client,
}

impl HttpMemoryStore {
    /// Create a client for the store at `base_url`.
    pub fn new(base_url: impl Into<String>, secret: Option<String>) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| StoreError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret,
            client,
        })
    }

    /// Create a client from the resolved configuration.
    pub fn from_config(config: &HookConfig) -> Result<Self, StoreError> {
        Self::new(config.api_url.clone(), config.secret.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.secret {
            Some(secret) => builder.header(SECRET_HEADER, secret),
            None => builder,
        }
    }

    /// POST a JSON body and decode a JSON answer.
    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, StoreError>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let request = self
            .authorize(self.client.post(self.url(path)))
            .header("Content-Type", "application/json")
            .json(body);

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let response = check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MemoryStore for HttpMemoryStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn search(
        &self,
        request: SearchRequest,
        timeout: Duration,
    ) -> Result<SearchResponse, StoreError> {
        debug!(top_k = request.top_k, url = %self.url(SEARCH_PATH), "Sending search request");

        let envelope: SearchEnvelope =
            with_timeout(timeout, self.post_json(SEARCH_PATH, &request)).await?;
        Ok(envelope.into_response())
    }

    async fn complete(
        &self,
        request: CompletionRequest,
        timeout: Duration,
    ) -> Result<String, StoreError> {
        debug!(max_tokens = request.max_tokens, "Sending completion request");

        let envelope: CompletionEnvelope =
            with_timeout(timeout, self.post_json(COMPLETE_PATH, &request)).await?;
        Ok(envelope
            .data
            .and_then(|d| d.response)
            .unwrap_or_default())
    }

    async fn health(&self, timeout: Duration) -> Result<(), StoreError> {
        with_timeout(timeout, async {
            let response = self
                .authorize(self.client.get(self.url(HEALTH_PATH)))
                .send()
                .await
                .map_err(|e| StoreError::Network(e.to_string()))?;
            check_status(response).await.map(|_| ())
        })
        .await
    }
}

async fn with_timeout<T, F>(timeout: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut body = response.text().await.unwrap_or_default();
    if body.len() > ERROR_BODY_LIMIT {
        let cut = (0..=ERROR_BODY_LIMIT)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }
    warn!(status = status.as_u16(), body = %body, "Memory store returned error");
    Err(StoreError::Status {
        status_code: status.as_u16(),
        body,
    })
}

// ── Wire envelopes ──────────────────────────────────────────────────────

/// Search answers nest buckets under `data`; some deployments put
/// `text_mem` at the top level instead.
#[derive(Debug, Default, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    data: Option<SearchData>,
    #[serde(default)]
    text_mem: Option<Vec<MemoryGroup>>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    text_mem: Option<Vec<MemoryGroup>>,
    #[serde(default)]
    skill_mem: Option<Vec<MemoryGroup>>,
    #[serde(default)]
    pref_mem: Option<Vec<MemoryGroup>>,
}

impl SearchEnvelope {
    fn into_response(self) -> SearchResponse {
        let data = self.data.unwrap_or_default();
        SearchResponse {
            text_mem: data.text_mem.or(self.text_mem).unwrap_or_default(),
            skill_mem: data.skill_mem.unwrap_or_default(),
            pref_mem: data.pref_mem.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CompletionEnvelope {
    #[serde(default)]
    data: Option<CompletionData>,
}

#[derive(Debug, Default, Deserialize)]
struct CompletionData {
    #[serde(default)]
    response: Option<String>,
}
