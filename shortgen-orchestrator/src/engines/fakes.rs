//! In-process engines for tests
//!
//! Narration bytes are the scene text, audio conversion copies files and the
//! captioner reads the text back, so scene content can be traced end to end.
//! Every engine appends to a shared event log.

use anyhow::Result;
use async_trait::async_trait;
use shortgen_clips::{AggregateError, ClipSource};
use shortgen_core::domain::caption::Caption;
use shortgen_core::domain::clip::ClipCandidate;
use shortgen_core::domain::render::{MusicMood, Orientation};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{
    AudioProcessor, Captioner, MusicLibrary, MusicTrack, NarrationAudio, RenderProps, Renderer,
    SpeechSynthesizer,
};
use crate::service::pipeline::Engines;

pub const NARRATION_SECONDS: f64 = 2.0;

pub type EventLog = Arc<Mutex<Vec<String>>>;

fn record(events: &EventLog, event: String) {
    events.lock().unwrap().push(event);
}

pub struct FakeSpeech {
    events: EventLog,
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, text: &str, _voice: &str) -> Result<NarrationAudio> {
        record(&self.events, format!("speech:{}", text));
        if text.contains("panic") {
            panic!("voice engine crashed on '{}'", text);
        }
        if text.contains("fail") {
            anyhow::bail!("voice server rejected '{}'", text);
        }
        Ok(NarrationAudio {
            bytes: text.as_bytes().to_vec(),
            duration_seconds: NARRATION_SECONDS,
        })
    }
}

pub struct FakeAudio;

#[async_trait]
impl AudioProcessor for FakeAudio {
    async fn normalize(&self, audio: &Path, dest: &Path) -> Result<PathBuf> {
        tokio::fs::copy(audio, dest).await?;
        Ok(dest.to_path_buf())
    }

    async fn to_transcoded_format(&self, audio: &Path, dest: &Path) -> Result<PathBuf> {
        tokio::fs::copy(audio, dest).await?;
        Ok(dest.to_path_buf())
    }
}

#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub search_terms: Vec<String>,
    pub min_duration_seconds: f64,
    pub exclude: HashSet<String>,
    pub orientation: Orientation,
}

#[derive(Default)]
pub struct RecordingClips {
    requests: Mutex<Vec<ClipRequest>>,
    served: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingClips {
    /// Answer every search with `NotFound` while set
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<ClipRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClipSource for RecordingClips {
    async fn find_videos(
        &self,
        search_terms: &[String],
        min_duration_seconds: f64,
        exclude_ids: &HashSet<String>,
        orientation: Orientation,
    ) -> Result<Vec<ClipCandidate>, AggregateError> {
        self.requests.lock().unwrap().push(ClipRequest {
            search_terms: search_terms.to_vec(),
            min_duration_seconds,
            exclude: exclude_ids.clone(),
            orientation,
        });
        if self.failing.load(Ordering::SeqCst) {
            return Err(AggregateError::NotFound {
                query: search_terms.join(" "),
            });
        }
        let n = self.served.fetch_add(1, Ordering::SeqCst);
        Ok(vec![ClipCandidate {
            id: format!("clip-{}", n),
            url: format!("https://media.example/clip-{}.mp4", n),
            width: 720,
            height: 1280,
            duration: min_duration_seconds,
        }])
    }
}

pub struct FakeCaptioner;

#[async_trait]
impl Captioner for FakeCaptioner {
    async fn create_captions(&self, audio: &Path) -> Result<Vec<Caption>> {
        let text = tokio::fs::read_to_string(audio).await?;
        Ok(vec![Caption {
            text,
            start_ms: 0,
            end_ms: (NARRATION_SECONDS * 1000.0) as u64,
        }])
    }
}

pub struct FakeMusic;

#[async_trait]
impl MusicLibrary for FakeMusic {
    async fn pick_track(&self, mood: MusicMood) -> Result<MusicTrack> {
        Ok(MusicTrack {
            path: PathBuf::from(format!("/music/{}/track.mp3", mood)),
            mood,
        })
    }
}

/// Writes a small file at the output path, optionally after a delay
pub struct FakeRenderer {
    events: EventLog,
    delay: Mutex<Duration>,
    skip_output: AtomicBool,
    active: AtomicUsize,
    peak: AtomicUsize,
    last_props: Mutex<Option<RenderProps>>,
}

impl FakeRenderer {
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn set_skip_output(&self, skip: bool) {
        self.skip_output.store(skip, Ordering::SeqCst);
    }

    /// Highest number of renders observed in flight at once
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn last_props(&self) -> Option<RenderProps> {
        self.last_props.lock().unwrap().clone()
    }
}

#[async_trait]
impl Renderer for FakeRenderer {
    async fn render(
        &self,
        _composition: &str,
        props: &RenderProps,
        _work_dir: &Path,
        output: &Path,
    ) -> Result<()> {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        record(&self.events, format!("render-start:{}", stem));

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        tokio::time::sleep(delay).await;

        *self.last_props.lock().unwrap() = Some(props.clone());
        if !self.skip_output.load(Ordering::SeqCst) {
            tokio::fs::write(output, b"fake mp4").await?;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        record(&self.events, format!("render-end:{}", stem));
        Ok(())
    }
}

/// A full set of fakes sharing one event log
pub struct FakeEngines {
    pub events: EventLog,
    pub clips: Arc<RecordingClips>,
    pub renderer: Arc<FakeRenderer>,
}

impl FakeEngines {
    pub fn new() -> Self {
        let events: EventLog = Arc::default();
        Self {
            clips: Arc::new(RecordingClips::default()),
            renderer: Arc::new(FakeRenderer {
                events: Arc::clone(&events),
                delay: Mutex::new(Duration::from_millis(5)),
                skip_output: AtomicBool::new(false),
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                last_props: Mutex::new(None),
            }),
            events,
        }
    }

    pub fn engines(&self) -> Engines {
        Engines {
            speech: Arc::new(FakeSpeech {
                events: Arc::clone(&self.events),
            }),
            audio: Arc::new(FakeAudio),
            clips: self.clips.clone(),
            captioner: Arc::new(FakeCaptioner),
            music: Arc::new(FakeMusic),
            renderer: self.renderer.clone(),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}
