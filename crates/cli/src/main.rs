//! paperqa CLI
//!
//! Main entry point for the paperqa command-line tool.
//! Summarizes research papers and answers questions about them with a local model.

mod commands;

use clap::{Parser, Subcommand};
use commands::{ChatCommand, CheckCommand, SummarizeCommand};
use paperqa_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// paperqa - research paper summaries and Q&A with a local model
#[derive(Parser, Debug)]
#[command(name = "paperqa")]
#[command(about = "Summarize and question research papers with a local model", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "PAPERQA_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "PAPERQA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Model identifier
    #[arg(short, long, global = true, env = "PAPERQA_MODEL")]
    model: Option<String>,

    /// Generation backend URL
    #[arg(short, long, global = true, env = "OLLAMA_URL")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a paper from its most relevant sections
    Summarize(SummarizeCommand),

    /// Ask questions about a paper interactively
    Chat(ChatCommand),

    /// Check that the generation backend answers
    Check(CheckCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    let config = AppConfig::load_from(cli.workspace.clone(), cli.config.clone())?;

    // A model given after the file on `summarize` wins over --model
    let model = match &cli.command {
        Commands::Summarize(cmd) => cmd.model.clone().or(cli.model),
        _ => cli.model,
    };

    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        model,
        cli.endpoint,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("paperqa starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {} at {}", config.provider, config.endpoint);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Summarize(_) => "summarize",
        Commands::Chat(_) => "chat",
        Commands::Check(_) => "check",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Summarize(cmd) => cmd.execute(&config).await,
        Commands::Chat(cmd) => cmd.execute(&config).await,
        Commands::Check(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
