//! Prompts-related command implementations

use anyhow::Result;
use mentor_core::prompts::{default_prompts_dir, PromptId, PromptLibrary};

/// List all available prompts and their override status
pub fn cmd_prompts_list() -> Result<()> {
    let mut library = PromptLibrary::new();

    println!("Available Prompts:\n");

    // Header
    println!("{:<25} {:>7}  {:<10}  {}", "ID", "VERSION", "LANGUAGE", "OVERRIDE");
    println!("{}", "-".repeat(60));

    for id in PromptId::all() {
        let has_override = library.has_override(*id);
        let prompt = library.get(*id)?;
        let override_status = if has_override { "✓ Custom" } else { "Default" };

        println!(
            "{:<25} {:>7}  {:<10}  {}",
            prompt.metadata.id, prompt.metadata.version, prompt.metadata.language, override_status
        );
    }

    println!();
    println!(
        "Override directory: {}",
        default_prompts_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not available)".to_string())
    );

    println!();
    println!("To customize a prompt:");
    println!("  1. Copy the default to the override directory");
    println!("  2. Edit the file with your changes");
    println!("  3. Restart the server to use the new prompt");

    Ok(())
}

/// Show the content of a specific prompt
pub fn cmd_prompts_show(prompt_id: &str) -> Result<()> {
    let mut library = PromptLibrary::new();

    // Find matching prompt ID
    let id = match prompt_id {
        "financial_advice" => PromptId::FinancialAdvice,
        "personalized_tip" => PromptId::PersonalizedTip,
        "negotiation_roleplay" => PromptId::NegotiationRoleplay,
        "explain_term" => PromptId::ExplainTerm,
        _ => {
            eprintln!("Unknown prompt ID: {}", prompt_id);
            eprintln!();
            eprintln!("Available prompts:");
            for id in PromptId::all() {
                eprintln!("  - {}", id.as_str());
            }
            return Ok(());
        }
    };

    let prompt = library.get(id)?;

    println!("Prompt: {}", prompt.metadata.id);
    println!("Version: {}", prompt.metadata.version);
    println!("Language: {}", prompt.metadata.language);
    println!(
        "Source: {}",
        if prompt.is_override {
            "Override"
        } else {
            "Default"
        }
    );

    if let Some(ref path) = prompt.override_path {
        println!("Override Path: {}", path.display());
    }

    println!();
    println!("--- Content ---");
    println!("{}", prompt.content);

    Ok(())
}

/// Show the path where prompt overrides should be placed
pub fn cmd_prompts_path() -> Result<()> {
    match default_prompts_dir() {
        Some(path) => {
            println!("{}", path.display());

            // Check if directory exists
            if !path.exists() {
                eprintln!();
                eprintln!("Note: This directory does not exist yet.");
                eprintln!("Create it to start adding custom prompts.");
            }
        }
        None => {
            eprintln!("Could not determine prompts directory.");
            eprintln!("The data directory is not available on this system.");
        }
    }

    Ok(())
}
