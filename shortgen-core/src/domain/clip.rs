//! Clip candidate domain type

use serde::{Deserialize, Serialize};

/// A visual asset returned by a clip provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipCandidate {
    /// Provider-scoped identifier
    pub id: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Length in seconds; zero when the provider did not report one
    pub duration: f64,
}

impl ClipCandidate {
    /// Whether the candidate carries everything needed to be used in a video
    pub fn is_usable(&self) -> bool {
        !self.url.is_empty() && self.duration > 0.0
    }
}
