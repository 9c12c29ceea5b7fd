//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `diagnose` - Offline diagnostic of a saved profile file
//! - `progress` - Legacy progress file inspection
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command

pub mod diagnose;
pub mod progress;
pub mod prompts;
pub mod serve;

// Re-export command functions for main.rs
pub use diagnose::*;
pub use progress::*;
pub use prompts::*;
pub use serve::*;
