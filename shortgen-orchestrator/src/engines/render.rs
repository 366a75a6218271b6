//! Rendering through the remotion CLI

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

use super::{RenderProps, Renderer, process};

const PROPS_FILE: &str = "props.json";

/// Runs `<command> remotion render <entry> <composition> <output> --props=<file>`
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    command: String,
    entry: String,
}

impl CommandRenderer {
    pub fn new(command: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            entry: entry.into(),
        }
    }

    fn args(&self, composition: &str, output: &Path, props_file: &Path) -> Vec<OsString> {
        let mut props_arg = OsString::from("--props=");
        props_arg.push(props_file.as_os_str());

        vec![
            "remotion".into(),
            "render".into(),
            self.entry.clone().into(),
            composition.into(),
            output.as_os_str().to_owned(),
            props_arg,
        ]
    }
}

#[async_trait]
impl Renderer for CommandRenderer {
    async fn render(
        &self,
        composition: &str,
        props: &RenderProps,
        work_dir: &Path,
        output: &Path,
    ) -> Result<()> {
        let props_file = work_dir.join(PROPS_FILE);
        let json = serde_json::to_vec_pretty(props).context("Failed to serialize render props")?;
        tokio::fs::write(&props_file, json)
            .await
            .with_context(|| format!("Failed to write {}", props_file.display()))?;

        tracing::info!("Rendering {} to {}", composition, output.display());
        process::run(&self.command, self.args(composition, output, &props_file)).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::{MusicTrack, RenderScene};
    use shortgen_core::domain::caption::Caption;
    use shortgen_core::domain::render::{CaptionPosition, MusicMood};
    use std::path::PathBuf;

    fn props() -> RenderProps {
        RenderProps {
            scenes: vec![RenderScene {
                captions: vec![Caption {
                    text: "hi".to_string(),
                    start_ms: 0,
                    end_ms: 300,
                }],
                clip_urls: vec!["https://media.example/1.mp4".to_string()],
                audio_path: PathBuf::from("/tmp/scene-0.mp3"),
                audio_duration_seconds: 1.2,
            }],
            width: 1080,
            height: 1920,
            music: MusicTrack {
                path: PathBuf::from("/music/chill/a.mp3"),
                mood: MusicMood::Chill,
            },
            music_volume: 0.5,
            caption_position: CaptionPosition::Bottom,
            caption_background_color: "blue".to_string(),
            padding_back_ms: 1500,
        }
    }

    #[test]
    fn test_args() {
        let renderer = CommandRenderer::new("npx", "src/index.ts");
        let args = renderer.args(
            "PortraitVideo",
            Path::new("/v/out.mp4"),
            Path::new("/t/props.json"),
        );
        let args: Vec<&str> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(
            args,
            [
                "remotion",
                "render",
                "src/index.ts",
                "PortraitVideo",
                "/v/out.mp4",
                "--props=/t/props.json"
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_render_writes_props_and_runs_command() {
        let dir = tempfile::tempdir().unwrap();
        // `true` ignores its arguments and succeeds
        let renderer = CommandRenderer::new("true", "src/index.ts");
        renderer
            .render("PortraitVideo", &props(), dir.path(), &dir.path().join("out.mp4"))
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join(PROPS_FILE)).unwrap();
        let parsed: RenderProps = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed, props());
        assert!(written.contains("\"clipUrls\""));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_render_failure() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = CommandRenderer::new("false", "src/index.ts");
        let result = renderer
            .render("PortraitVideo", &props(), dir.path(), &dir.path().join("out.mp4"))
            .await;
        assert!(result.is_err());
    }
}
