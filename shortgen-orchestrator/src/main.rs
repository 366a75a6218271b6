//! Shortgen Orchestrator
//!
//! HTTP service that turns scene scripts into short videos.
//!
//! Architecture:
//! - Configuration: Load settings from environment or defaults
//! - Repository: In-memory job registry
//! - Services: Single-consumer job queue and the video pipeline
//! - Engines: Speech, ffmpeg, whisper.cpp, music library, renderer, clip search
//! - API: axum router exposing the video endpoints

pub mod api;
pub mod config;
pub mod engines;
pub mod repository;
pub mod service;
pub mod storage;

use anyhow::{Context, Result};
use shortgen_clips::{Aggregator, ClipProvider, GiphyClient, TenorClient};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::engines::{
    CommandRenderer, DirectoryMusicLibrary, FfmpegAudio, HttpSpeechSynthesizer, WhisperCaptioner,
};
use crate::service::job_service::Orchestrator;
use crate::service::pipeline::{Engines, VideoPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "shortgen_orchestrator=debug,shortgen_clips=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortgen Orchestrator...");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    info!(
        "Loaded configuration: data_dir={}, tts_url={}",
        config.data_dir.display(),
        config.tts_url
    );

    let paths = config.storage_paths();
    storage::ensure_directories(&paths).context("Failed to create data directories")?;

    let pipeline = build_pipeline(&config).await?;
    let orchestrator = Orchestrator::new(paths, pipeline, tokio::runtime::Handle::current());

    // Build router with all API endpoints
    let app = api::create_router(orchestrator);

    info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}

/// Wire the production engines from configuration
async fn build_pipeline(config: &Config) -> Result<VideoPipeline> {
    let http = shortgen_clips::http_client(config.provider_timeout)
        .context("Failed to build provider HTTP client")?;

    if config.tenor_api_key.is_none() {
        warn!("TENOR_API_KEY is not set; Tenor searches will fail");
    }
    if config.giphy_api_key.is_none() {
        warn!("GIPHY_API_KEY is not set; Giphy searches will fail");
    }

    let providers: Vec<Arc<dyn ClipProvider>> = vec![
        Arc::new(TenorClient::new(config.tenor_api_key.clone(), http.clone())),
        Arc::new(GiphyClient::new(config.giphy_api_key.clone(), http)),
    ];
    let aggregator = Aggregator::new(providers);
    info!("Clip aggregator initialized with {} providers", aggregator.provider_count());

    let ffmpeg = FfmpegAudio::new(config.ffmpeg_path.clone());
    if let Err(err) = ffmpeg.check_available().await {
        warn!("ffmpeg check failed, jobs will fail at audio conversion: {:#}", err);
    }

    // speech requests are bounded by the stage timeout
    let speech = HttpSpeechSynthesizer::new(
        config.tts_url.clone(),
        config.tts_model.clone(),
        reqwest::Client::new(),
    );

    let engines = Engines {
        speech: Arc::new(speech),
        audio: Arc::new(ffmpeg),
        clips: Arc::new(aggregator),
        captioner: Arc::new(WhisperCaptioner::new(
            config.whisper_path.clone(),
            config.whisper_model.clone(),
        )),
        music: Arc::new(DirectoryMusicLibrary::new(config.music_dir.clone())),
        renderer: Arc::new(CommandRenderer::new(
            config.render_command.clone(),
            config.render_entry.clone(),
        )),
    };

    Ok(VideoPipeline::new(engines, config.stage_timeout))
}
