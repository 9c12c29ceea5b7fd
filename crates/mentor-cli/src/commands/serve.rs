//! Server command implementation

use std::path::{Path, PathBuf};

use anyhow::Result;

pub async fn cmd_serve(
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    progress_dir: Option<PathBuf>,
) -> Result<()> {
    // Flag wins over the environment variable
    let progress_dir = progress_dir.or_else(|| {
        std::env::var("MENTOR_PROGRESS_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    });

    // Extra CORS origins (comma-separated); empty means same-origin only
    let allowed_origins: Vec<String> = std::env::var("MENTOR_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    println!("🚀 Starting Mentor web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    match progress_dir {
        Some(ref dir) => println!("   Progress files: {}", dir.display()),
        None => println!("   Progress files: disabled (set MENTOR_PROGRESS_DIR to enable)"),
    }
    if std::env::var("GOOGLE_API_KEY").map_or(true, |k| k.is_empty()) {
        println!();
        println!("   ⚠️  GOOGLE_API_KEY not set - advisor runs in metric-only mode");
    }
    if !allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} (MENTOR_ALLOWED_ORIGINS)",
            allowed_origins.join(", ")
        );
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = mentor_server::ServerConfig {
        allowed_origins,
        progress_dir,
    };

    let static_dir_str =
        static_dir.map(|p| p.to_str().expect("static_dir path must be valid UTF-8"));
    mentor_server::serve(host, port, static_dir_str, config).await?;

    Ok(())
}
