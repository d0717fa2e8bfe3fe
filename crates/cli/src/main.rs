//! memhook CLI: the hook entry point.
//!
//! Commands:
//! - `inject`: the UserPromptSubmit hook, reads the event from stdin and
//!   prints memory context (the default when no command is given)
//! - `health`: the SessionStart hook, reports whether the store is reachable
//! - `preview`: Run the pipeline for a prompt and show what would be injected
//! - `config`: Show the effective configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "memhook",
    about = "memhook: memory injection hooks for coding agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Inject relevant memories for the prompt on stdin
    Inject,

    /// Check that the memory store is reachable
    Health,

    /// Show the context that would be injected for a prompt
    Preview {
        /// The prompt to look up
        prompt: String,
    },

    /// Show the effective configuration
    Config,
}

fn init_tracing(verbose: bool, json: bool) {
    // stdout carries the hook payload; logs go to stderr.
    let filter = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    match cli.command.unwrap_or(Commands::Inject) {
        Commands::Inject => commands::inject::run().await,
        Commands::Health => commands::health::run().await?,
        Commands::Preview { prompt } => commands::preview::run(&prompt).await?,
        Commands::Config => commands::config_cmd::run()?,
    }

    Ok(())
}
