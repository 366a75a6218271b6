//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod video;

use anyhow::Result;
use clap::Subcommand;
use std::path::PathBuf;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Queue a new short video
    Create {
        /// Scene as "narration text|search term,search term" (repeatable, in order)
        #[arg(short, long = "scene", required = true, value_parser = video::parse_scene)]
        scenes: Vec<shortgen_core::domain::job::SceneInput>,

        /// Frame orientation (portrait or landscape)
        #[arg(long)]
        orientation: Option<String>,

        /// Background music mood
        #[arg(long)]
        mood: Option<String>,

        /// Narration voice
        #[arg(long)]
        voice: Option<String>,

        /// Silence after the last scene, in milliseconds
        #[arg(long)]
        padding_ms: Option<u64>,
    },
    /// List all videos
    List,
    /// Show the status of a video
    Status {
        /// Video ID or unambiguous prefix
        id: String,
    },
    /// Delete a finished or failed video
    Delete {
        /// Video ID or unambiguous prefix
        id: String,
    },
    /// Download a finished video
    Download {
        /// Video ID or unambiguous prefix
        id: String,

        /// Output file (defaults to <id>.mp4)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List available music moods
    Moods,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    video::handle_video_command(command, config).await
}
