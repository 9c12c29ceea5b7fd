//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod advisor;
pub mod challenges;
pub mod dashboard;
pub mod education;
pub mod profile;
pub mod sessions;
pub mod status;

// Re-export all handlers for use in router
pub use advisor::*;
pub use challenges::*;
pub use dashboard::*;
pub use education::*;
pub use profile::*;
pub use sessions::*;
pub use status::*;
