//! `memhook inject`: the UserPromptSubmit hook.
//!
//! Never fails from the host's point of view: malformed input, missing
//! configuration and store errors all end in "no output, exit 0".

use memhook_config::HookConfig;
use memhook_core::hook::{HookInput, HookOutput};
use memhook_pipeline::InjectionPipeline;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use super::{emit, http_pipeline};

/// Largest trigger event read from stdin.
const MAX_INPUT_BYTES: u64 = 1_048_576;

pub async fn run() {
    if let Err(e) = try_run().await {
        warn!(error = %e, "Memory injection skipped");
    }
}

async fn try_run() -> anyhow::Result<()> {
    let raw = read_stdin().await?;
    let input = HookInput::parse(&raw)?;
    let pipeline = http_pipeline(HookConfig::load()?)?;

    match respond(&input, &pipeline).await {
        Some(output) => emit(&output),
        None => Ok(()),
    }
}

/// The payload to print for one trigger event, if any.
pub async fn respond(input: &HookInput, pipeline: &InjectionPipeline) -> Option<HookOutput> {
    let outcome = pipeline.run(input.prompt()).await;
    debug!(outcome = outcome.describe(), "Pipeline finished");
    outcome
        .into_context()
        .map(|context| HookOutput::new(input.event_name(), context))
}

async fn read_stdin() -> std::io::Result<String> {
    let mut raw = String::new();
    tokio::io::stdin()
        .take(MAX_INPUT_BYTES)
        .read_to_string(&mut raw)
        .await?;
    Ok(raw)
}
