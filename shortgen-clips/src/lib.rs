//! Shortgen clip sourcing
//!
//! HTTP clients for the GIF/clip search providers and the aggregator that
//! fans a query out to all of them and assembles a clip set covering a
//! target duration.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashSet;
//! use std::sync::Arc;
//! use shortgen_clips::{Aggregator, ClipProvider, ClipSource, GiphyClient, TenorClient, http_client};
//! use shortgen_core::domain::render::Orientation;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let http = http_client(std::time::Duration::from_secs(20))?;
//! let providers: Vec<Arc<dyn ClipProvider>> = vec![
//!     Arc::new(TenorClient::new(Some("tenor-key".to_string()), http.clone())),
//!     Arc::new(GiphyClient::new(Some("giphy-key".to_string()), http)),
//! ];
//! let aggregator = Aggregator::new(providers);
//!
//! let clips = aggregator
//!     .find_videos(&["cat".to_string()], 6.0, &HashSet::new(), Orientation::Portrait)
//!     .await?;
//! println!("selected {} clips", clips.len());
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod error;
mod giphy;
mod tenor;

// Re-export commonly used types
pub use aggregator::{Aggregator, ClipSource, select_clips};
pub use error::{AggregateError, ProviderError, Result};
pub use giphy::GiphyClient;
pub use tenor::TenorClient;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shortgen_core::domain::clip::ClipCandidate;
use std::time::Duration;

/// A clip search provider
///
/// Each provider is independent and may fail on its own.
#[async_trait]
pub trait ClipProvider: Send + Sync {
    /// Human readable provider name, used in logs
    fn name(&self) -> &'static str;

    /// Search the provider for clips matching `query`
    async fn search(&self, query: &str) -> Result<Vec<ClipCandidate>>;
}

/// Build the HTTP client shared by all providers
///
/// The timeout bounds every provider request so a stalled provider cannot
/// hold up the aggregator indefinitely.
pub fn http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

// =============================================================================
// Response Handlers
// =============================================================================

/// Check the status code of a provider response and deserialize its JSON body
pub(crate) async fn handle_response<T: DeserializeOwned>(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ProviderError::api_error(provider, status.as_u16(), error_text));
    }

    response.json().await.map_err(|e| {
        ProviderError::ParseError(format!("Failed to parse {} response: {}", provider, e))
    })
}

/// Trim a trailing slash off a base URL
pub(crate) fn normalize_base_url(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}
