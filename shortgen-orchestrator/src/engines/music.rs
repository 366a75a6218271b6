//! Background music from a mood-organized directory
//!
//! Layout: `<music_dir>/<mood>/*.mp3`. Tracks within a mood are taken in
//! file-name order, rotating on every pick.

use anyhow::{Context, Result};
use async_trait::async_trait;
use shortgen_core::domain::render::MusicMood;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{MusicLibrary, MusicTrack};

#[derive(Debug)]
pub struct DirectoryMusicLibrary {
    root: PathBuf,
    picks: AtomicUsize,
}

impl DirectoryMusicLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            picks: AtomicUsize::new(0),
        }
    }

    async fn tracks(&self, mood: MusicMood) -> Result<Vec<PathBuf>> {
        let dir = self.root.join(mood.as_str());
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .with_context(|| format!("No music directory for mood {} at {}", mood, dir.display()))?;

        let mut tracks = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_mp3 = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"));
            if is_mp3 {
                tracks.push(path);
            }
        }
        tracks.sort();
        Ok(tracks)
    }
}

#[async_trait]
impl MusicLibrary for DirectoryMusicLibrary {
    async fn pick_track(&self, mood: MusicMood) -> Result<MusicTrack> {
        let tracks = self.tracks(mood).await?;
        if tracks.is_empty() {
            anyhow::bail!("No tracks available for mood {}", mood);
        }

        let index = self.picks.fetch_add(1, Ordering::Relaxed) % tracks.len();
        let path = tracks[index].clone();
        tracing::debug!("Picked music track {} for mood {}", path.display(), mood);

        Ok(MusicTrack { path, mood })
    }
}
