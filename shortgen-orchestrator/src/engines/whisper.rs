//! Caption generation with whisper.cpp
//!
//! whisper.cpp is run with token-level timestamps and JSON output (`-oj`).
//! Tokens are folded into words: a token that does not start with a space
//! continues the previous word.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use shortgen_core::domain::caption::Caption;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{Captioner, process};

#[derive(Debug, Clone)]
pub struct WhisperCaptioner {
    whisper_path: String,
    model: PathBuf,
}

impl WhisperCaptioner {
    pub fn new(whisper_path: impl Into<String>, model: impl Into<PathBuf>) -> Self {
        Self {
            whisper_path: whisper_path.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Captioner for WhisperCaptioner {
    async fn create_captions(&self, audio: &Path) -> Result<Vec<Caption>> {
        // whisper.cpp appends ".json" to the -of prefix
        let prefix = audio.with_extension("");
        let json_path = audio.with_extension("json");

        let args: Vec<OsString> = vec![
            "-m".into(),
            self.model.as_os_str().to_owned(),
            "-f".into(),
            audio.as_os_str().to_owned(),
            "-ml".into(),
            "1".into(),
            "-oj".into(),
            "-of".into(),
            prefix.into_os_string(),
            "-np".into(),
        ];
        process::run(&self.whisper_path, args).await?;

        let raw = tokio::fs::read_to_string(&json_path)
            .await
            .with_context(|| format!("Failed to read whisper output {}", json_path.display()))?;
        let captions = parse_transcript(&raw)?;

        tracing::debug!("Generated {} captions from {}", captions.len(), audio.display());
        Ok(captions)
    }
}

// =============================================================================
// whisper.cpp JSON
// =============================================================================

#[derive(Debug, Deserialize)]
struct Transcript {
    #[serde(default)]
    transcription: Vec<Segment>,
}

#[derive(Debug, Deserialize)]
struct Segment {
    #[serde(default)]
    tokens: Vec<Token>,
}

#[derive(Debug, Deserialize)]
struct Token {
    text: String,
    offsets: Offsets,
}

#[derive(Debug, Deserialize)]
struct Offsets {
    from: u64,
    to: u64,
}

pub fn parse_transcript(raw: &str) -> Result<Vec<Caption>> {
    let transcript: Transcript =
        serde_json::from_str(raw).context("Failed to parse whisper JSON output")?;

    let mut captions: Vec<Caption> = Vec::new();
    for token in transcript.transcription.into_iter().flat_map(|s| s.tokens) {
        // special tokens such as [_BEG_] and [_TT_150]
        if token.text.starts_with("[_") || token.text.trim().is_empty() {
            continue;
        }

        let starts_word = token.text.starts_with(' ');
        match captions.last_mut() {
            Some(last) if !starts_word => {
                last.text.push_str(&token.text);
                last.end_ms = token.offsets.to;
            }
            _ => captions.push(Caption {
                text: token.text.trim().to_string(),
                start_ms: token.offsets.from,
                end_ms: token.offsets.to,
            }),
        }
    }

    Ok(captions)
}
