//! Error types for clip sourcing

use thiserror::Error;

/// Result type alias for provider operations
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors a single clip provider can return
///
/// The aggregator never propagates these; a failing provider contributes
/// zero candidates.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Provider returned an error status code
    #[error("{provider} API error (status {status}): {message}")]
    ApiError {
        /// Provider name
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Provider is missing required credentials
    #[error("{0} API key not set")]
    MissingApiKey(&'static str),
}

impl ProviderError {
    /// Create an API error from status code and message
    pub fn api_error(provider: &'static str, status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            provider,
            status,
            message: message.into(),
        }
    }

    /// Check if this error comes from missing configuration
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::MissingApiKey(_))
    }
}

/// Errors surfaced to callers of the aggregator
#[derive(Debug, Error)]
pub enum AggregateError {
    /// No candidate survived exclusion and filtering
    #[error("No clip candidates available for '{query}'")]
    NotFound {
        /// The joined search query
        query: String,
    },
}
