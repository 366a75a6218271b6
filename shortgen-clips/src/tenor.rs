//! Tenor search client

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shortgen_core::domain::clip::ClipCandidate;

use crate::error::{ProviderError, Result};
use crate::{ClipProvider, handle_response, normalize_base_url};

const PROVIDER: &str = "Tenor";
const DEFAULT_BASE_URL: &str = "https://tenor.googleapis.com";
const RESULT_LIMIT: &str = "50";

/// HTTP client for the Tenor v2 search API
#[derive(Debug, Clone)]
pub struct TenorClient {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl TenorClient {
    /// Create a client against the public Tenor API
    ///
    /// A missing key is not an error here; it surfaces on the first search.
    pub fn new(api_key: Option<String>, client: Client) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, client)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>, client: Client) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url: normalize_base_url(base_url),
            client,
        }
    }
}

#[async_trait]
impl ClipProvider for TenorClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn search(&self, query: &str) -> Result<Vec<ClipCandidate>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey(PROVIDER))?;

        let url = format!("{}/v2/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("key", api_key),
                ("limit", RESULT_LIMIT),
                ("media_filter", "mp4"),
            ])
            .send()
            .await?;

        let body: SearchResponse = handle_response(PROVIDER, response).await?;
        Ok(body.into_candidates())
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: String,
    #[serde(default)]
    duration: Option<f64>,
    media_formats: MediaFormats,
}

#[derive(Debug, Deserialize)]
struct MediaFormats {
    mp4: Option<MediaFormat>,
}

#[derive(Debug, Deserialize)]
struct MediaFormat {
    url: String,
    #[serde(default)]
    dims: Vec<u32>,
    #[serde(default)]
    duration: Option<f64>,
}

impl SearchResponse {
    /// Results without an mp4 rendition are dropped
    fn into_candidates(self) -> Vec<ClipCandidate> {
        self.results
            .into_iter()
            .filter_map(|result| {
                let mp4 = result.media_formats.mp4?;
                let width = mp4.dims.first().copied().unwrap_or(0);
                let height = mp4.dims.get(1).copied().unwrap_or(0);
                let duration = result
                    .duration
                    .filter(|d| *d > 0.0)
                    .or(mp4.duration)
                    .unwrap_or(0.0);
                Some(ClipCandidate {
                    id: result.id,
                    url: mp4.url,
                    width,
                    height,
                    duration,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_body() -> serde_json::Value {
        serde_json::json!({
            "results": [
                {
                    "id": "t1",
                    "duration": 2.5,
                    "media_formats": { "mp4": { "url": "https://media.tenor.com/t1.mp4", "dims": [480, 854] } }
                },
                {
                    "id": "t2",
                    "media_formats": { "mp4": { "url": "https://media.tenor.com/t2.mp4", "dims": [640, 360], "duration": 1.2 } }
                },
                {
                    "id": "t3",
                    "media_formats": {}
                }
            ]
        })
    }

    #[test]
    fn test_into_candidates() {
        let body: SearchResponse = serde_json::from_value(sample_body()).unwrap();
        let candidates = body.into_candidates();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "t1");
        assert_eq!((candidates[0].width, candidates[0].height), (480, 854));
        assert_eq!(candidates[0].duration, 2.5);
        // falls back to the rendition's duration
        assert_eq!(candidates[1].duration, 1.2);
    }

    #[tokio::test]
    async fn test_search_hits_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/search"))
            .and(query_param("q", "happy cat"))
            .and(query_param("key", "secret"))
            .and(query_param("media_filter", "mp4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample_body()))
            .mount(&server)
            .await;

        let client = TenorClient::with_base_url(server.uri(), Some("secret".to_string()), Client::new());
        let candidates = client.search("happy cat").await.unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[tokio::test]
    async fn test_search_reports_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/search"))
            .respond_with(ResponseTemplate::new(403).set_body_string("bad key"))
            .mount(&server)
            .await;

        let client = TenorClient::with_base_url(server.uri(), Some("wrong".to_string()), Client::new());
        let err = client.search("cat").await.unwrap_err();
        assert!(matches!(err, ProviderError::ApiError { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_search_without_key_is_config_error() {
        let client = TenorClient::new(Some(String::new()), Client::new());
        let err = client.search("cat").await.unwrap_err();
        assert!(err.is_config_error());
    }
}
