//! `memhook preview`: show what the hook would inject for a prompt.

use memhook_config::HookConfig;
use memhook_pipeline::Outcome;

use super::http_pipeline;

pub async fn run(prompt: &str) -> anyhow::Result<()> {
    let config = HookConfig::load()?;
    println!("🔍 Looking up memories at {} ...", config.api_url);

    let pipeline = http_pipeline(config)?;
    match pipeline.run(prompt).await {
        Outcome::Injected(context) => {
            println!();
            println!("{context}");
        }
        other => println!("   Nothing would be injected: {}", other.describe()),
    }

    Ok(())
}
