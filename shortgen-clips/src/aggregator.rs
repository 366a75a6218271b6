//! Clip sourcing aggregator
//!
//! Fans a query out to every configured provider at once, merges the results
//! in provider order and greedily picks a prefix whose total duration covers
//! the requested target.

use async_trait::async_trait;
use futures::future::join_all;
use shortgen_core::domain::clip::ClipCandidate;
use shortgen_core::domain::render::Orientation;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::ClipProvider;
use crate::error::AggregateError;

/// Anything that can source clips for a scene
///
/// The orchestrator depends on this trait rather than on the concrete
/// aggregator.
#[async_trait]
pub trait ClipSource: Send + Sync {
    /// Find clips matching `search_terms` whose durations add up to at least
    /// `min_duration_seconds`, skipping ids in `exclude_ids`
    async fn find_videos(
        &self,
        search_terms: &[String],
        min_duration_seconds: f64,
        exclude_ids: &HashSet<String>,
        orientation: Orientation,
    ) -> Result<Vec<ClipCandidate>, AggregateError>;
}

/// Aggregates candidates from a fixed, ordered set of providers
pub struct Aggregator {
    providers: Vec<Arc<dyn ClipProvider>>,
}

impl Aggregator {
    /// Providers are queried concurrently but their results are merged in
    /// the order given here
    pub fn new(providers: Vec<Arc<dyn ClipProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Query every provider concurrently; a failed provider yields nothing
    async fn fetch_all(&self, query: &str) -> Vec<ClipCandidate> {
        let searches = self.providers.iter().map(|provider| async move {
            match provider.search(query).await {
                Ok(candidates) => {
                    debug!(
                        "{} returned {} candidate(s) for '{}'",
                        provider.name(),
                        candidates.len(),
                        query
                    );
                    candidates
                }
                Err(e) => {
                    warn!("{} search failed for '{}': {}", provider.name(), query, e);
                    Vec::new()
                }
            }
        });

        // join_all keeps input order, so provider order is preserved
        join_all(searches).await.into_iter().flatten().collect()
    }
}

#[async_trait]
impl ClipSource for Aggregator {
    async fn find_videos(
        &self,
        search_terms: &[String],
        min_duration_seconds: f64,
        exclude_ids: &HashSet<String>,
        orientation: Orientation,
    ) -> Result<Vec<ClipCandidate>, AggregateError> {
        let query = search_terms.join(" ");
        debug!("Searching {} provider(s) for '{}'", self.providers.len(), query);

        let candidates = self.fetch_all(&query).await;
        let selected = select_clips(candidates, min_duration_seconds, exclude_ids, orientation);

        if selected.is_empty() {
            return Err(AggregateError::NotFound { query });
        }

        let total: f64 = selected.iter().map(|c| c.duration).sum();
        if total < min_duration_seconds {
            warn!(
                "Only {:.2}s of clips found for '{}' (wanted {:.2}s)",
                total, query, min_duration_seconds
            );
        }
        debug!("Selected {} clip(s) for '{}'", selected.len(), query);

        Ok(selected)
    }
}

/// Filter merged candidates and greedily select a covering prefix.
///
/// Drops candidates that are excluded, unusable (no url or no duration),
/// or do not fit `orientation`. Of what remains,
/// returns the shortest prefix whose summed duration reaches
/// `min_duration_seconds`, or everything if the target is never reached.
pub fn select_clips(
    candidates: Vec<ClipCandidate>,
    min_duration_seconds: f64,
    exclude_ids: &HashSet<String>,
    orientation: Orientation,
) -> Vec<ClipCandidate> {
    let mut selected = Vec::new();
    let mut total = 0.0;

    let eligible = candidates.into_iter().filter(|c| {
        !exclude_ids.contains(&c.id)
            && c.is_usable()
            && orientation.admits(c.width, c.height)
    });

    for candidate in eligible {
        total += candidate.duration;
        selected.push(candidate);
        if total >= min_duration_seconds {
            break;
        }
    }

    selected
}
