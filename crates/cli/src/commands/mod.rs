pub mod config_cmd;
pub mod health;
pub mod inject;
pub mod preview;

use std::io::Write;
use std::sync::Arc;

use memhook_config::HookConfig;
use memhook_core::hook::HookOutput;
use memhook_pipeline::InjectionPipeline;
use memhook_store::HttpMemoryStore;

/// Build the pipeline against the HTTP store named in `config`.
pub fn http_pipeline(config: HookConfig) -> anyhow::Result<InjectionPipeline> {
    let store = HttpMemoryStore::from_config(&config)?;
    Ok(InjectionPipeline::new(Arc::new(store), config))
}

/// Print one hook payload on stdout.
pub fn emit(output: &HookOutput) -> anyhow::Result<()> {
    let json = output.to_json()?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    stdout.flush()?;
    Ok(())
}
