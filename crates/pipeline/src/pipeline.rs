//! `InjectionPipeline`: gate, retrieve, filter, format, assemble.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use memhook_config::HookConfig;
use memhook_core::store::MemoryStore;
use tracing::{debug, info};

use crate::assembler::assemble;
use crate::format::BudgetFormatter;
use crate::gate::should_query;
use crate::relevance::filter_relevant;
use crate::retriever::retrieve;

/// How a run ended. Only `Injected` produces output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The gate turned the prompt away; nothing was sent.
    Skipped,
    /// Retrieval failed or found nothing in any category.
    NoCandidates,
    /// Candidates existed but every category formatted to nothing.
    Empty,
    /// The wrapped context block.
    Injected(String),
}

impl Outcome {
    pub fn into_context(self) -> Option<String> {
        match self {
            Self::Injected(context) => Some(context),
            _ => None,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Skipped => "prompt skipped by the query gate",
            Self::NoCandidates => "no memories retrieved",
            Self::Empty => "no memories survived filtering and formatting",
            Self::Injected(_) => "context injected",
        }
    }
}

/// One configured pipeline, built once per process.
pub struct InjectionPipeline {
    store: Arc<dyn MemoryStore>,
    config: HookConfig,
    formatter: BudgetFormatter,
}

impl InjectionPipeline {
    pub fn new(store: Arc<dyn MemoryStore>, config: HookConfig) -> Self {
        let formatter = BudgetFormatter::from_capabilities(&config.capabilities);
        Self {
            store,
            config,
            formatter,
        }
    }

    pub async fn run(&self, prompt: &str) -> Outcome {
        self.run_at(prompt, Utc::now()).await
    }

    /// Run against a fixed clock; recency tags are computed from `now`.
    pub async fn run_at(&self, prompt: &str, now: DateTime<Utc>) -> Outcome {
        if !should_query(prompt) {
            debug!("Prompt gated, skipping retrieval");
            return Outcome::Skipped;
        }

        let store = self.store.as_ref();
        let Some(mut candidates) = retrieve(store, &self.config, prompt).await else {
            return Outcome::NoCandidates;
        };

        if self.config.capabilities.rerank_enabled && !candidates.text.is_empty() {
            let text = std::mem::take(&mut candidates.text);
            candidates.text = filter_relevant(store, &self.config, prompt, text).await;
        }

        let blocks: Vec<_> = [
            self.formatter.format_text(&candidates.text, now),
            self.formatter.format_skills(&candidates.skill),
            self.formatter.format_preferences(&candidates.preference),
        ]
        .into_iter()
        .flatten()
        .collect();
        for block in &blocks {
            debug!(category = %block.category, lines = block.lines.len(), "Formatted block");
        }

        match assemble(blocks) {
            Some(context) => {
                info!(chars = context.chars().count(), "Memory context assembled");
                Outcome::Injected(context)
            }
            None => Outcome::Empty,
        }
    }
}
