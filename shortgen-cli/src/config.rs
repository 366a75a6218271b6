//! Configuration module
//!
//! Settings shared by every command.

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Shortgen orchestrator
    pub orchestrator_url: String,
}
