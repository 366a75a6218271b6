//! Orchestrator configuration
//!
//! Defines where data lives, how to reach the external engines
//! (speech, ffmpeg, whisper, renderer, clip providers) and the timeouts that
//! keep one slow engine from stalling the job queue.

use std::path::PathBuf;
use std::time::Duration;

use crate::storage::StoragePaths;

/// Orchestrator configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory for videos, temp files and engine libraries
    pub data_dir: PathBuf,

    /// Address the HTTP API binds to
    pub bind_addr: String,

    /// Tenor API key; searches fail with a configuration error when unset
    pub tenor_api_key: Option<String>,

    /// Giphy API key; searches fail with a configuration error when unset
    pub giphy_api_key: Option<String>,

    /// Base URL of the speech synthesis server (OpenAI-compatible)
    pub tts_url: String,

    /// Model name sent to the speech server
    pub tts_model: String,

    /// ffmpeg executable
    pub ffmpeg_path: String,

    /// whisper.cpp executable
    pub whisper_path: String,

    /// whisper.cpp model file
    pub whisper_model: PathBuf,

    /// Render executable (e.g. "npx")
    pub render_command: String,

    /// Composition entry point handed to `remotion render`
    pub render_entry: String,

    /// Directory with one sub-directory of tracks per music mood
    pub music_dir: PathBuf,

    /// Timeout for each clip provider request
    pub provider_timeout: Duration,

    /// Timeout for each pipeline stage of a job
    pub stage_timeout: Duration,
}

impl Config {
    /// Creates a configuration rooted at `data_dir` with defaults
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            whisper_model: data_dir.join("libs").join("ggml-base.en.bin"),
            music_dir: data_dir.join("music"),
            data_dir,
            bind_addr: "0.0.0.0:3123".to_string(),
            tenor_api_key: None,
            giphy_api_key: None,
            tts_url: "http://localhost:8880".to_string(),
            tts_model: "kokoro".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            whisper_path: "whisper-cli".to_string(),
            render_command: "npx".to_string(),
            render_entry: "src/index.ts".to_string(),
            provider_timeout: Duration::from_secs(20),
            stage_timeout: Duration::from_secs(900), // 15 minutes
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Recognized environment variables (all optional):
    /// - SHORTGEN_DATA_DIR (default: $HOME/.shortgen)
    /// - SHORTGEN_BIND_ADDR (default: 0.0.0.0:3123)
    /// - TENOR_API_KEY, GIPHY_API_KEY
    /// - TTS_URL (default: http://localhost:8880), TTS_MODEL (default: kokoro)
    /// - FFMPEG_PATH, WHISPER_PATH, WHISPER_MODEL
    /// - RENDER_COMMAND (default: npx), RENDER_ENTRY (default: src/index.ts)
    /// - MUSIC_DIR (default: $SHORTGEN_DATA_DIR/music)
    /// - PROVIDER_TIMEOUT (seconds, default: 20)
    /// - STAGE_TIMEOUT (seconds, default: 900)
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = match std::env::var("SHORTGEN_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let home = std::env::var("HOME").map_err(|_| {
                    anyhow::anyhow!("Neither SHORTGEN_DATA_DIR nor HOME is set")
                })?;
                PathBuf::from(home).join(".shortgen")
            }
        };

        let mut config = Self::new(data_dir);

        if let Ok(addr) = std::env::var("SHORTGEN_BIND_ADDR") {
            config.bind_addr = addr;
        }
        config.tenor_api_key = std::env::var("TENOR_API_KEY").ok();
        config.giphy_api_key = std::env::var("GIPHY_API_KEY").ok();
        if let Ok(url) = std::env::var("TTS_URL") {
            config.tts_url = url;
        }
        if let Ok(model) = std::env::var("TTS_MODEL") {
            config.tts_model = model;
        }
        if let Ok(path) = std::env::var("FFMPEG_PATH") {
            config.ffmpeg_path = path;
        }
        if let Ok(path) = std::env::var("WHISPER_PATH") {
            config.whisper_path = path;
        }
        if let Ok(model) = std::env::var("WHISPER_MODEL") {
            config.whisper_model = PathBuf::from(model);
        }
        if let Ok(command) = std::env::var("RENDER_COMMAND") {
            config.render_command = command;
        }
        if let Ok(entry) = std::env::var("RENDER_ENTRY") {
            config.render_entry = entry;
        }
        if let Ok(dir) = std::env::var("MUSIC_DIR") {
            config.music_dir = PathBuf::from(dir);
        }

        config.provider_timeout = std::env::var("PROVIDER_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(config.provider_timeout);

        config.stage_timeout = std::env::var("STAGE_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(config.stage_timeout);

        Ok(config)
    }

    /// Filesystem layout derived from `data_dir`
    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths::new(self.data_dir.clone())
    }

    /// Validates the configuration
    ///
    /// Missing provider keys are not an error here; they surface when the
    /// provider is first searched.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("bind_addr cannot be empty");
        }

        if !self.tts_url.starts_with("http://") && !self.tts_url.starts_with("https://") {
            anyhow::bail!("tts_url must start with http:// or https://");
        }

        if self.render_command.is_empty() {
            anyhow::bail!("render_command cannot be empty");
        }

        if self.provider_timeout.as_secs() == 0 {
            anyhow::bail!("provider_timeout must be greater than 0");
        }

        if self.stage_timeout.as_secs() == 0 {
            anyhow::bail!("stage_timeout must be greater than 0");
        }

        Ok(())
    }
}
