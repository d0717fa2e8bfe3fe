//! `memhook config`: show the effective configuration.

use memhook_config::HookConfig;

pub fn run() -> anyhow::Result<()> {
    let path = HookConfig::config_path();
    println!("📄 Config file: {}", path.display());
    if !path.exists() {
        println!("   (not found, using environment and defaults)");
    }
    println!();

    match HookConfig::load() {
        Ok(config) => {
            for line in config.render().lines() {
                println!("   {line}");
            }
        }
        Err(e) => println!("   ❌ Config error: {e}"),
    }

    Ok(())
}
