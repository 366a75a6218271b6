//! Video job DTOs for the orchestrator API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::job::{Job, JobStatus, SceneInput};
use crate::domain::render::RenderConfigInput;

/// Request to create a new short video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVideo {
    pub scenes: Vec<SceneInput>,
    #[serde(default)]
    pub config: RenderConfigInput,
}

/// Response to a successful create request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedVideo {
    pub video_id: Uuid,
}

/// Job summary for listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: Uuid,
    pub status: JobStatus,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl From<Job> for VideoSummary {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            status: job.status,
            requested_at: job.requested_at,
            completed_at: job.completed_at,
            error: job.error,
        }
    }
}

/// Response body of the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoList {
    pub videos: Vec<VideoSummary>,
}

/// Response body of the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStatus {
    pub status: JobStatus,
}
