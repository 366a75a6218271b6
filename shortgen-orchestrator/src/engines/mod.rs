//! Engines
//!
//! The external programs and servers a job's pipeline delegates to. Each one
//! sits behind a narrow async trait so the pipeline can be driven by fakes in
//! tests and by the process/HTTP adapters in production.

#[cfg(test)]
pub mod fakes;
pub mod ffmpeg;
pub mod music;
pub mod process;
pub mod render;
pub mod speech;
pub mod whisper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shortgen_core::domain::caption::Caption;
use shortgen_core::domain::render::{CaptionPosition, MusicMood};
use std::path::{Path, PathBuf};

pub use ffmpeg::FfmpegAudio;
pub use music::DirectoryMusicLibrary;
pub use render::CommandRenderer;
pub use speech::HttpSpeechSynthesizer;
pub use whisper::WhisperCaptioner;

/// Synthesized narration for one scene
#[derive(Debug, Clone)]
pub struct NarrationAudio {
    pub bytes: Vec<u8>,
    pub duration_seconds: f64,
}

/// A background track picked for a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicTrack {
    pub path: PathBuf,
    pub mood: MusicMood,
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> anyhow::Result<NarrationAudio>;
}

#[async_trait]
pub trait AudioProcessor: Send + Sync {
    /// Write a 16 kHz mono WAV of `audio` to `dest`
    async fn normalize(&self, audio: &Path, dest: &Path) -> anyhow::Result<PathBuf>;

    /// Write the delivery encoding (MP3) of `audio` to `dest`
    async fn to_transcoded_format(&self, audio: &Path, dest: &Path) -> anyhow::Result<PathBuf>;
}

#[async_trait]
pub trait Captioner: Send + Sync {
    async fn create_captions(&self, audio: &Path) -> anyhow::Result<Vec<Caption>>;
}

#[async_trait]
pub trait MusicLibrary: Send + Sync {
    async fn pick_track(&self, mood: MusicMood) -> anyhow::Result<MusicTrack>;
}

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Render `props` with `composition` into `output`
    ///
    /// Resolves only once the artifact at `output` is complete. `work_dir` is
    /// scratch space owned by the job.
    async fn render(
        &self,
        composition: &str,
        props: &RenderProps,
        work_dir: &Path,
        output: &Path,
    ) -> anyhow::Result<()>;
}

// =============================================================================
// Render Input
// =============================================================================

/// Everything the composition needs to draw one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderProps {
    pub scenes: Vec<RenderScene>,
    pub width: u32,
    pub height: u32,
    pub music: MusicTrack,
    pub music_volume: f32,
    pub caption_position: CaptionPosition,
    pub caption_background_color: String,
    pub padding_back_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderScene {
    pub captions: Vec<Caption>,
    pub clip_urls: Vec<String>,
    pub audio_path: PathBuf,
    pub audio_duration_seconds: f64,
}
