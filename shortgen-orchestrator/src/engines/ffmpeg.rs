//! Audio conversion through ffmpeg

use anyhow::Result;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{AudioProcessor, process};

/// Sample rate whisper.cpp expects
const CAPTION_SAMPLE_RATE: &str = "16000";

#[derive(Debug, Clone)]
pub struct FfmpegAudio {
    ffmpeg_path: String,
}

impl FfmpegAudio {
    pub fn new(ffmpeg_path: impl Into<String>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
        }
    }

    /// Checks that ffmpeg can be executed
    pub async fn check_available(&self) -> Result<()> {
        let version = process::run(&self.ffmpeg_path, ["-version"]).await?;
        tracing::info!(
            "ffmpeg is available: {}",
            version.lines().next().unwrap_or_default()
        );
        Ok(())
    }

    async fn convert(&self, input: &Path, dest: &Path, codec_args: &[&str]) -> Result<PathBuf> {
        let args = conversion_args(input, dest, codec_args);
        process::run(&self.ffmpeg_path, args).await?;
        Ok(dest.to_path_buf())
    }
}

fn conversion_args(input: &Path, dest: &Path, codec_args: &[&str]) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-y", "-hide_banner", "-loglevel", "error", "-i"]
        .iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());
    args.extend(codec_args.iter().map(OsString::from));
    args.push(dest.as_os_str().to_owned());
    args
}

#[async_trait]
impl AudioProcessor for FfmpegAudio {
    async fn normalize(&self, audio: &Path, dest: &Path) -> Result<PathBuf> {
        self.convert(
            audio,
            dest,
            &["-ar", CAPTION_SAMPLE_RATE, "-ac", "1", "-c:a", "pcm_s16le"],
        )
        .await
    }

    async fn to_transcoded_format(&self, audio: &Path, dest: &Path) -> Result<PathBuf> {
        self.convert(audio, dest, &["-c:a", "libmp3lame", "-b:a", "128k"])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_args_order() {
        let args = conversion_args(
            Path::new("/tmp/in.wav"),
            Path::new("/tmp/out.mp3"),
            &["-c:a", "libmp3lame"],
        );
        let args: Vec<&str> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(
            args,
            [
                "-y",
                "-hide_banner",
                "-loglevel",
                "error",
                "-i",
                "/tmp/in.wav",
                "-c:a",
                "libmp3lame",
                "/tmp/out.mp3"
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_ffmpeg_fails() {
        let ffmpeg = FfmpegAudio::new("shortgen-missing-ffmpeg");
        assert!(ffmpeg.check_available().await.is_err());
        let result = ffmpeg
            .normalize(Path::new("in.wav"), Path::new("out.wav"))
            .await;
        assert!(result.is_err());
    }
}
