//! Giphy search client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shortgen_core::domain::clip::ClipCandidate;

use crate::error::{ProviderError, Result};
use crate::{ClipProvider, handle_response, normalize_base_url};

const PROVIDER: &str = "Giphy";
const DEFAULT_BASE_URL: &str = "https://api.giphy.com";
const RESULT_LIMIT: &str = "50";

/// Frame rate assumed when Giphy reports frames but no duration
const ASSUMED_FPS: f64 = 30.0;

/// HTTP client for the Giphy search API
#[derive(Debug, Clone)]
pub struct GiphyClient {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GiphyClient {
    pub fn new(api_key: Option<String>, client: Client) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, client)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>, client: Client) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url: normalize_base_url(base_url),
            client,
        }
    }
}

#[async_trait]
impl ClipProvider for GiphyClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, query: &str) -> Result<Vec<ClipCandidate>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(PROVIDER))?;

        let url = format!("{}/v1/gifs/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("api_key", api_key), ("q", query), ("limit", RESULT_LIMIT)])
            .send()
            .await?;

        let body: SearchResponse = handle_response(PROVIDER, response).await?;
        Ok(body.into_candidates())
    }
}

// =============================================================================
// Wire Types
// =============================================================================

// Giphy encodes every numeric field as a string.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Gif>,
}

#[derive(Debug, Deserialize)]
struct Gif {
    id: String,
    images: Images,
}

#[derive(Debug, Deserialize)]
struct Images {
    original: Original,
}

#[derive(Debug, Deserialize)]
struct Original {
    #[serde(default)]
    mp4: Option<String>,
    #[serde(default)]
    width: Option<String>,
    #[serde(default)]
    height: Option<String>,
    #[serde(default)]
    frames: Option<String>,
    #[serde(default)]
    duration: Option<String>,
}

impl Original {
    fn duration_seconds(&self) -> f64 {
        if let Some(duration) = self.duration.as_deref().and_then(|d| d.parse::<f64>().ok()) {
            return duration;
        }
        self.frames
            .as_deref()
            .and_then(|f| f.parse::<u32>().ok())
            .map(|frames| f64::from(frames) / ASSUMED_FPS)
            .unwrap_or(0.0)
    }
}

fn parse_dimension(value: Option<&str>) -> u32 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0)
}

impl SearchResponse {
    fn into_candidates(self) -> Vec<ClipCandidate> {
        self.data
            .into_iter()
            .map(|gif| {
                let original = gif.images.original;
                let duration = original.duration_seconds();
                ClipCandidate {
                    id: gif.id,
                    url: original.mp4.unwrap_or_default(),
                    width: parse_dimension(original.width.as_deref()),
                    height: parse_dimension(original.height.as_deref()),
                    duration,
                }
            })
            .collect()
    }
}
