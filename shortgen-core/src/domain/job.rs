//! Job domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::render::RenderConfig;

/// One scene of a short video: narration text plus clip search terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneInput {
    pub text: String,
    pub search_terms: Vec<String>,
}

/// Video generation job
///
/// Created by the orchestrator on enqueue. Only the worker processing the
/// job writes `status`, `completed_at` and `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub scenes: Vec<SceneInput>,
    pub config: RenderConfig,
    pub status: JobStatus,
    pub requested_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Job {
    /// Creates a fresh job in the `Processing` state
    pub fn new(scenes: Vec<SceneInput>, config: RenderConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            scenes,
            config,
            status: JobStatus::Processing,
            requested_at: Utc::now(),
            completed_at: None,
            error: None,
        }
    }

    /// Returns the terminal version of this job for the given outcome.
    ///
    /// A job that is already terminal is returned unchanged; terminal states
    /// never move again.
    pub fn finished(mut self, outcome: Result<(), String>) -> Self {
        if self.status.is_terminal() {
            return self;
        }
        match outcome {
            Ok(()) => {
                self.status = JobStatus::Ready;
                self.error = None;
            }
            Err(message) => {
                self.status = JobStatus::Failed;
                self.error = Some(message);
            }
        }
        self.completed_at = Some(Utc::now());
        self
    }
}

/// Job lifecycle status
///
/// `Processing` is the only initial state; `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Ready,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Ready | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Ready => write!(f, "ready"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}
