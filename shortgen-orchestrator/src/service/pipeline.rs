//! Video Pipeline
//!
//! The fixed sequence of stages that turns one job into a video:
//! narration, audio conversion, clip sourcing, captions, music, render.
//! Every stage is bounded by the configured stage timeout.

use shortgen_clips::ClipSource;
use shortgen_core::domain::job::Job;
use std::collections::HashSet;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::engines::{
    AudioProcessor, Captioner, MusicLibrary, RenderProps, RenderScene, Renderer,
    SpeechSynthesizer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Speech,
    Audio,
    Clips,
    Captions,
    Music,
    Render,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Speech => "speech synthesis",
            Stage::Audio => "audio conversion",
            Stage::Clips => "clip sourcing",
            Stage::Captions => "captioning",
            Stage::Music => "music selection",
            Stage::Render => "rendering",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("{stage} failed: {message}")]
    Failed { stage: Stage, message: String },

    #[error("{stage} timed out after {}s", .timeout.as_secs_f64())]
    Timeout { stage: Stage, timeout: Duration },
}

impl StageError {
    pub fn stage(&self) -> Stage {
        match self {
            StageError::Failed { stage, .. } | StageError::Timeout { stage, .. } => *stage,
        }
    }
}

/// The engines a pipeline delegates to
#[derive(Clone)]
pub struct Engines {
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub audio: Arc<dyn AudioProcessor>,
    pub clips: Arc<dyn ClipSource>,
    pub captioner: Arc<dyn Captioner>,
    pub music: Arc<dyn MusicLibrary>,
    pub renderer: Arc<dyn Renderer>,
}

#[derive(Clone)]
pub struct VideoPipeline {
    engines: Engines,
    stage_timeout: Duration,
}

impl VideoPipeline {
    pub fn new(engines: Engines, stage_timeout: Duration) -> Self {
        Self {
            engines,
            stage_timeout,
        }
    }

    /// Produce the video for `job` at `output`, using `work_dir` for scratch files
    pub async fn run(&self, job: &Job, work_dir: &Path, output: &Path) -> Result<(), StageError> {
        let config = &job.config;
        let last_scene = job.scenes.len().saturating_sub(1);
        let mut used_clips: HashSet<String> = HashSet::new();
        let mut scenes = Vec::with_capacity(job.scenes.len());

        for (index, scene) in job.scenes.iter().enumerate() {
            tracing::debug!("Job {} scene {}/{}", job.id, index + 1, job.scenes.len());

            let narration = self
                .stage(
                    Stage::Speech,
                    self.engines.speech.synthesize(&scene.text, &config.voice),
                )
                .await?;

            let raw = work_dir.join(format!("scene-{}-raw.wav", index));
            let (normalized, transcoded) = self
                .stage(Stage::Audio, async {
                    tokio::fs::write(&raw, &narration.bytes).await?;
                    let normalized = self
                        .engines
                        .audio
                        .normalize(&raw, &work_dir.join(format!("scene-{}.wav", index)))
                        .await?;
                    let transcoded = self
                        .engines
                        .audio
                        .to_transcoded_format(&raw, &work_dir.join(format!("scene-{}.mp3", index)))
                        .await?;
                    Ok::<_, anyhow::Error>((normalized, transcoded))
                })
                .await?;

            let mut target_seconds = narration.duration_seconds;
            if index == last_scene {
                target_seconds += config.padding_back_ms as f64 / 1000.0;
            }

            let clips = self
                .stage(Stage::Clips, async {
                    let clips = self
                        .engines
                        .clips
                        .find_videos(
                            &scene.search_terms,
                            target_seconds,
                            &used_clips,
                            config.orientation,
                        )
                        .await?;
                    Ok::<_, anyhow::Error>(clips)
                })
                .await?;
            used_clips.extend(clips.iter().map(|clip| clip.id.clone()));

            let captions = self
                .stage(Stage::Captions, self.engines.captioner.create_captions(&normalized))
                .await?;

            scenes.push(RenderScene {
                captions,
                clip_urls: clips.into_iter().map(|clip| clip.url).collect(),
                audio_path: transcoded,
                audio_duration_seconds: narration.duration_seconds,
            });
        }

        let music = self
            .stage(Stage::Music, self.engines.music.pick_track(config.music))
            .await?;

        let (width, height) = config.orientation.dimensions();
        let props = RenderProps {
            scenes,
            width,
            height,
            music,
            music_volume: config.music_volume.gain(),
            caption_position: config.caption_position,
            caption_background_color: config.caption_background_color.clone(),
            padding_back_ms: config.padding_back_ms,
        };

        self.stage(
            Stage::Render,
            self.engines
                .renderer
                .render(config.orientation.composition(), &props, work_dir, output),
        )
        .await?;

        // the renderer must leave a finished artifact behind
        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(StageError::Failed {
                stage: Stage::Render,
                message: format!("no video produced at {}", output.display()),
            });
        }

        Ok(())
    }

    async fn stage<T, F>(&self, stage: Stage, work: F) -> Result<T, StageError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        match tokio::time::timeout(self.stage_timeout, work).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(StageError::Failed {
                stage,
                message: format!("{:#}", err),
            }),
            Err(_) => Err(StageError::Timeout {
                stage,
                timeout: self.stage_timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::fakes::FakeEngines;
    use shortgen_core::domain::job::SceneInput;
    use shortgen_core::domain::render::{Orientation, RenderConfig};

    fn job(scenes: &[&str]) -> Job {
        let scenes = scenes
            .iter()
            .map(|text| SceneInput {
                text: text.to_string(),
                search_terms: vec!["ocean".to_string(), "waves".to_string()],
            })
            .collect();
        Job::new(scenes, RenderConfig::default())
    }

    #[tokio::test]
    async fn test_run_produces_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let fakes = FakeEngines::new();
        let pipeline = VideoPipeline::new(fakes.engines(), Duration::from_secs(5));
        let output = dir.path().join("out.mp4");

        pipeline.run(&job(&["one", "two"]), dir.path(), &output).await.unwrap();

        assert!(output.exists());
        let props = fakes.renderer.last_props().unwrap();
        assert_eq!(props.scenes.len(), 2);
        assert_eq!((props.width, props.height), Orientation::Portrait.dimensions());
        assert_eq!(props.scenes[0].captions[0].text, "one");
    }

    #[tokio::test]
    async fn test_clip_requests_exclude_earlier_scenes_and_pad_last() {
        let dir = tempfile::tempdir().unwrap();
        let fakes = FakeEngines::new();
        let pipeline = VideoPipeline::new(fakes.engines(), Duration::from_secs(5));

        pipeline
            .run(&job(&["a", "b", "c"]), dir.path(), &dir.path().join("out.mp4"))
            .await
            .unwrap();

        let requests = fakes.clips.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].exclude.is_empty());
        assert_eq!(requests[1].exclude.len(), 1);
        assert_eq!(requests[2].exclude.len(), 2);
        assert_eq!(requests[0].search_terms, ["ocean", "waves"]);

        // narration is 2s per scene; the last one gets the 1.5s tail
        assert_eq!(requests[0].min_duration_seconds, 2.0);
        assert_eq!(requests[1].min_duration_seconds, 2.0);
        assert_eq!(requests[2].min_duration_seconds, 3.5);
    }

    #[tokio::test]
    async fn test_stage_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let fakes = FakeEngines::new();
        let pipeline = VideoPipeline::new(fakes.engines(), Duration::from_secs(5));

        let err = pipeline
            .run(&job(&["fail here"]), dir.path(), &dir.path().join("out.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Speech);
        assert!(err.to_string().contains("speech synthesis failed"));
    }

    #[tokio::test]
    async fn test_stage_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let fakes = FakeEngines::new();
        fakes.renderer.set_delay(Duration::from_secs(10));
        let pipeline = VideoPipeline::new(fakes.engines(), Duration::from_millis(50));

        let err = pipeline
            .run(&job(&["slow"]), dir.path(), &dir.path().join("out.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, StageError::Timeout { stage: Stage::Render, .. }));
    }

    #[tokio::test]
    async fn test_missing_artifact_fails_render() {
        let dir = tempfile::tempdir().unwrap();
        let fakes = FakeEngines::new();
        fakes.renderer.set_skip_output(true);
        let pipeline = VideoPipeline::new(fakes.engines(), Duration::from_secs(5));

        let err = pipeline
            .run(&job(&["quiet"]), dir.path(), &dir.path().join("out.mp4"))
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Render);
    }
}
