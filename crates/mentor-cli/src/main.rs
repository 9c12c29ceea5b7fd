//! Mentor CLI - Personal financial health advisor
//!
//! Usage:
//!   mentor serve --port 3000       Start web server
//!   mentor diagnose --file p.json  Analyze a saved profile
//!   mentor progress --dir DATA     Show legacy progress files
//!   mentor prompts list            List advisor prompts

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Serve {
            port,
            host,
            static_dir,
            progress_dir,
        } => commands::cmd_serve(&host, port, static_dir.as_deref(), progress_dir).await,
        Commands::Diagnose { file } => commands::cmd_diagnose(&file),
        Commands::Progress { dir, name } => commands::cmd_progress(&dir, name.as_deref()),
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
