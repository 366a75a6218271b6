//! Speech synthesis over an OpenAI-compatible HTTP endpoint

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{NarrationAudio, SpeechSynthesizer};

/// Client for a local TTS server exposing `/v1/audio/speech`
#[derive(Debug, Clone)]
pub struct HttpSpeechSynthesizer {
    base_url: String,
    model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

impl HttpSpeechSynthesizer {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<NarrationAudio> {
        let url = format!("{}/v1/audio/speech", self.base_url);
        let request = SpeechRequest {
            model: &self.model,
            input: text,
            voice,
            response_format: "wav",
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Speech request to {} failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Speech server returned {}: {}", status.as_u16(), body);
        }

        let bytes = response
            .bytes()
            .await
            .context("Failed to read speech audio")?
            .to_vec();
        let duration_seconds = wav_duration_seconds(&bytes)?;

        tracing::debug!(
            "Synthesized {} bytes ({:.2}s) with voice {}",
            bytes.len(),
            duration_seconds,
            voice
        );

        Ok(NarrationAudio {
            bytes,
            duration_seconds,
        })
    }
}

/// Duration of a RIFF/WAVE buffer, from its `fmt ` byte rate and `data` size
///
/// Streaming servers may leave the data size as a placeholder; the size is
/// then clamped to the bytes actually present.
pub fn wav_duration_seconds(bytes: &[u8]) -> Result<f64> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        anyhow::bail!("Audio is not a RIFF/WAVE file");
    }

    let mut byte_rate: Option<u32> = None;
    let mut offset = 12;

    while offset + 8 <= bytes.len() {
        let id = &bytes[offset..offset + 4];
        let size = read_u32(bytes, offset + 4) as usize;
        let body = offset + 8;

        match id {
            b"fmt " => {
                if body + 12 > bytes.len() {
                    break;
                }
                byte_rate = Some(read_u32(bytes, body + 8));
            }
            b"data" => {
                let rate = byte_rate.context("WAVE data chunk precedes fmt chunk")?;
                if rate == 0 {
                    anyhow::bail!("WAVE byte rate is zero");
                }
                let available = bytes.len() - body;
                let size = size.min(available);
                return Ok(size as f64 / f64::from(rate));
            }
            _ => {}
        }

        // chunks are word aligned
        offset = body.saturating_add(size).saturating_add(size & 1);
    }

    anyhow::bail!("WAVE file has no data chunk")
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}
