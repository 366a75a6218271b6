//! Video command handlers
//!
//! Handles creating, listing, inspecting, downloading and deleting videos.

use anyhow::{Context, Result};
use colored::*;
use shortgen_core::domain::job::{JobStatus, SceneInput};
use shortgen_core::domain::render::{MusicMood, Orientation, RenderConfigInput};
use shortgen_core::dto::job::{CreateVideo, VideoSummary};
use std::path::PathBuf;

use super::Commands;
use crate::api::ApiClient;
use crate::config::Config;
use crate::id_resolver::resolve_video_id;
use crate::types::IdOrPrefix;

/// Handle video commands
pub async fn handle_video_command(command: Commands, config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.orchestrator_url);

    match command {
        Commands::Create {
            scenes,
            orientation,
            mood,
            voice,
            padding_ms,
        } => {
            let config = build_config(orientation, mood, voice, padding_ms)?;
            create_video(&client, scenes, config).await
        }
        Commands::List => list_videos(&client).await,
        Commands::Status { id } => show_status(&client, &id).await,
        Commands::Delete { id } => delete_video(&client, &id).await,
        Commands::Download { id, output } => download_video(&client, &id, output).await,
        Commands::Moods => list_moods(&client).await,
    }
}

/// Parse "narration text|term1,term2" into a scene
pub fn parse_scene(s: &str) -> Result<SceneInput, String> {
    let (text, terms) = s
        .rsplit_once('|')
        .ok_or_else(|| format!("expected \"TEXT|TERM1,TERM2\", got `{}`", s))?;

    let text = text.trim();
    if text.is_empty() {
        return Err("scene text cannot be empty".to_string());
    }

    let search_terms: Vec<String> = terms
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    if search_terms.is_empty() {
        return Err(format!("scene `{}` has no search terms", text));
    }

    Ok(SceneInput {
        text: text.to_string(),
        search_terms,
    })
}

fn build_config(
    orientation: Option<String>,
    mood: Option<String>,
    voice: Option<String>,
    padding_ms: Option<u64>,
) -> Result<RenderConfigInput> {
    let orientation = orientation
        .map(|o| match o.to_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            other => Err(anyhow::anyhow!(
                "invalid orientation `{}` (expected portrait or landscape)",
                other
            )),
        })
        .transpose()?;

    let music = mood
        .map(|m| m.parse::<MusicMood>().map_err(anyhow::Error::msg))
        .transpose()?;

    Ok(RenderConfigInput {
        orientation,
        music,
        voice,
        padding_back_ms: padding_ms,
        ..Default::default()
    })
}

async fn create_video(
    client: &ApiClient,
    scenes: Vec<SceneInput>,
    config: RenderConfigInput,
) -> Result<()> {
    let scene_count = scenes.len();
    let created = client.create_video(&CreateVideo { scenes, config }).await?;

    println!("{}", "✓ Video queued".green().bold());
    println!("  ID:     {}", created.video_id.to_string().cyan());
    println!("  Scenes: {}", scene_count);

    Ok(())
}

async fn list_videos(client: &ApiClient) -> Result<()> {
    let list = client.list_videos().await?;

    if list.videos.is_empty() {
        println!("{}", "No videos found.".yellow());
    } else {
        println!("{}", format!("Found {} video(s):", list.videos.len()).bold());
        println!();
        for video in &list.videos {
            print_video_summary(video);
        }
    }

    Ok(())
}

async fn show_status(client: &ApiClient, id: &str) -> Result<()> {
    let uuid = resolve_video_id(client, &IdOrPrefix::parse(id)).await?;
    let status = client.get_status(uuid).await?;

    println!("{} {}", uuid.to_string().cyan(), colorize_status(status.status));

    Ok(())
}

async fn delete_video(client: &ApiClient, id: &str) -> Result<()> {
    let uuid = resolve_video_id(client, &IdOrPrefix::parse(id)).await?;
    client.delete_video(uuid).await?;

    println!("{} {}", "✓ Deleted video".green(), uuid.to_string().dimmed());

    Ok(())
}

async fn download_video(client: &ApiClient, id: &str, output: Option<PathBuf>) -> Result<()> {
    let uuid = resolve_video_id(client, &IdOrPrefix::parse(id)).await?;
    let output = output.unwrap_or_else(|| PathBuf::from(format!("{}.mp4", uuid)));

    let bytes = client.download_video(uuid).await?;
    tokio::fs::write(&output, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "{} {} ({} bytes)",
        "✓ Saved".green(),
        output.display(),
        bytes.len()
    );

    Ok(())
}

async fn list_moods(client: &ApiClient) -> Result<()> {
    let moods = client.list_music_tags().await?;

    println!("{}", "Music moods:".bold());
    for mood in moods {
        println!("  {}", mood);
    }

    Ok(())
}

fn print_video_summary(video: &VideoSummary) {
    println!("  {} Video {}", "▸".cyan(), video.id.to_string().dimmed());
    println!("    Status:    {}", colorize_status(video.status));
    println!(
        "    Requested: {}",
        video
            .requested_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    if let Some(completed) = video.completed_at {
        let seconds = completed
            .signed_duration_since(video.requested_at)
            .num_seconds();
        println!("    Took:      {}s", seconds);
    }
    if let Some(error) = &video.error {
        println!("    Error:     {}", error.red());
    }
    println!();
}

/// Colorize video status for display
fn colorize_status(status: JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Processing => status_str.yellow(),
        JobStatus::Ready => status_str.green(),
        JobStatus::Failed => status_str.red(),
    }
}
