//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mentor - Personal financial health advisor
#[derive(Parser)]
#[command(name = "mentor")]
#[command(about = "Self-hosted financial mentor and debt advisor", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Directory for legacy progress files (also MENTOR_PROGRESS_DIR)
        ///
        /// When set, consultation counters are persisted per user as
        /// <nome>_progresso.json and picked up again on the next session.
        #[arg(long)]
        progress_dir: Option<PathBuf>,
    },

    /// Run a financial diagnostic on a saved profile
    Diagnose {
        /// Profile JSON file to analyze
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Show legacy progress files from a directory
    Progress {
        /// Directory containing <nome>_progresso.json files
        #[arg(short, long)]
        dir: PathBuf,

        /// Show only the progress for this user
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Manage advisor prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., financial_advice)
        prompt_id: String,
    },

    /// Show the prompt override directory path
    Path,
}
