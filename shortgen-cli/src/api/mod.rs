//! API client module
//!
//! HTTP client for communicating with the Shortgen orchestrator API.

use anyhow::{Context, Result};
use reqwest::Client;
use shortgen_core::domain::render::MusicMood;
use shortgen_core::dto::job::{CreateVideo, CreatedVideo, VideoList, VideoStatus};
use uuid::Uuid;

/// HTTP client for the Shortgen orchestrator API
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the orchestrator API
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Queue a new video
    ///
    /// # Returns
    /// The ID assigned to the video
    pub async fn create_video(&self, req: &CreateVideo) -> Result<CreatedVideo> {
        let url = format!("{}/api/short-video", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(req)
            .send()
            .await
            .context("Failed to send create video request")?;

        self.handle_response(response).await
    }

    /// List all videos known to the orchestrator
    pub async fn list_videos(&self) -> Result<VideoList> {
        let url = format!("{}/api/short-videos", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send list videos request")?;

        self.handle_response(response).await
    }

    /// Get the status of a video
    pub async fn get_status(&self, id: Uuid) -> Result<VideoStatus> {
        let url = format!("{}/api/short-video/{}/status", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send video status request")?;

        self.handle_response(response).await
    }

    /// Download a finished video
    ///
    /// # Returns
    /// The raw MP4 bytes
    pub async fn download_video(&self, id: Uuid) -> Result<Vec<u8>> {
        let url = format!("{}/api/short-video/{}", self.base_url, id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send download request")?;

        let response = Self::check_status(response).await?;
        let bytes = response
            .bytes()
            .await
            .context("Failed to read video body")?;

        Ok(bytes.to_vec())
    }

    /// Delete a finished or failed video
    pub async fn delete_video(&self, id: Uuid) -> Result<()> {
        let url = format!("{}/api/short-video/{}", self.base_url, id);
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Failed to send delete video request")?;

        Self::check_status(response).await?;
        Ok(())
    }

    /// List the available background music moods
    pub async fn list_music_tags(&self) -> Result<Vec<MusicMood>> {
        let url = format!("{}/api/music-tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send music tags request")?;

        self.handle_response(response).await
    }

    /// Fail with the server's message on a non-success status
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Request failed with status {}: {}", status, error_text);
        }
        Ok(response)
    }

    /// Handle API response and deserialize JSON
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        Self::check_status(response)
            .await?
            .json()
            .await
            .context("Failed to parse response JSON")
    }
}
