//! GitLab group explorer and SonarQube project linker.
//!
//! `gitlab-groups` walks a GitLab group hierarchy and prints nested JSON, an
//! indented text tree, a flat id/path listing or recently active projects.
//! `sonar-link` reads SonarQube ALM settings, lists project components and
//! creates projects bound to GitLab repositories.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod http;
pub mod sonar;
pub mod types;

pub use error::{Error, Result};

use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` (default `warn`), so reports on
/// stdout stay clean.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
