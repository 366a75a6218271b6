//! Filesystem layout
//!
//! One data directory holds the finished videos, per-job working directories
//! and auxiliary files for the external engines. Creating the layout is
//! idempotent and runs once before the first job.

use std::path::PathBuf;
use uuid::Uuid;

/// Resolved on-disk layout
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub data_dir: PathBuf,
    pub videos_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub libs_dir: PathBuf,
}

impl StoragePaths {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            videos_dir: data_dir.join("videos"),
            temp_dir: data_dir.join("temp"),
            libs_dir: data_dir.join("libs"),
            data_dir,
        }
    }

    /// Output path of a job's video. Valid whether or not the job exists.
    pub fn video_path(&self, id: Uuid) -> PathBuf {
        self.videos_dir.join(format!("{}.mp4", id))
    }

    /// Scratch directory for a single job
    pub fn work_dir(&self, id: Uuid) -> PathBuf {
        self.temp_dir.join(id.to_string())
    }
}

/// Create every directory of the layout if missing
pub fn ensure_directories(paths: &StoragePaths) -> std::io::Result<()> {
    for dir in [&paths.videos_dir, &paths.temp_dir, &paths.libs_dir] {
        std::fs::create_dir_all(dir)?;
    }

    tracing::info!("Storage ready under {}", paths.data_dir.display());
    Ok(())
}
