//! Job Service
//!
//! Accepts video jobs and runs them one at a time, in submission order.
//!
//! `enqueue` appends to a FIFO and returns immediately. A single drain task
//! consumes the FIFO; it is spawned only when none is active, and it stops
//! only after observing an empty queue under the same lock that `enqueue`
//! takes, so a job can never be left behind.

use shortgen_core::domain::job::{Job, JobStatus, SceneInput};
use shortgen_core::domain::render::RenderConfig;
use shortgen_core::dto::job::CreateVideo;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::runtime::Handle;
use uuid::Uuid;

use crate::repository::job_repository::{JobRegistry, Removal};
use crate::service::pipeline::VideoPipeline;
use crate::storage::StoragePaths;

/// Service error type
#[derive(Debug)]
pub enum JobError {
    NotFound(Uuid),
    InvalidState(String),
    ValidationError(String),
    Io(std::io::Error),
}

impl From<std::io::Error> for JobError {
    fn from(err: std::io::Error) -> Self {
        JobError::Io(err)
    }
}

#[derive(Debug, Default)]
struct WorkQueue {
    pending: VecDeque<Uuid>,
    draining: bool,
}

struct Inner {
    registry: JobRegistry,
    queue: Mutex<WorkQueue>,
    pipeline: VideoPipeline,
    paths: StoragePaths,
    runtime: Handle,
}

/// Handle to the job orchestrator; clones share the same registry and queue
///
/// Workers run on the runtime given to [`Orchestrator::new`], so `enqueue`
/// may be called from any thread, inside a runtime or not.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl Orchestrator {
    pub fn new(paths: StoragePaths, pipeline: VideoPipeline, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                registry: JobRegistry::new(),
                queue: Mutex::new(WorkQueue::default()),
                pipeline,
                paths,
                runtime,
            }),
        }
    }

    /// Resolve a creation request and enqueue it
    pub fn create_video(&self, req: CreateVideo) -> Result<Uuid, JobError> {
        let config = req.config.resolve().map_err(JobError::ValidationError)?;
        self.enqueue(req.scenes, config)
    }

    /// Register a job and schedule it for processing
    pub fn enqueue(&self, scenes: Vec<SceneInput>, config: RenderConfig) -> Result<Uuid, JobError> {
        validate_scenes(&scenes)?;

        let job = Job::new(scenes, config);
        let id = job.id;
        self.inner.registry.insert(job);

        let start_worker = {
            let mut queue = self.queue();
            queue.pending.push_back(id);
            !std::mem::replace(&mut queue.draining, true)
        };

        tracing::info!("Job {} queued", id);

        if start_worker {
            tracing::debug!("Starting queue worker");
            self.inner.runtime.spawn(self.clone().drain());
        }

        Ok(id)
    }

    /// Snapshot of every job, oldest first
    pub fn list_all_videos(&self) -> Vec<Job> {
        self.inner.registry.list_all()
    }

    pub fn status(&self, id: Uuid) -> Result<JobStatus, JobError> {
        self.get(id).map(|job| job.status)
    }

    pub fn get(&self, id: Uuid) -> Result<Job, JobError> {
        self.inner
            .registry
            .find_by_id(id)
            .ok_or(JobError::NotFound(id))
    }

    /// Where the video for `id` is (or will be) written
    pub fn video_path(&self, id: Uuid) -> PathBuf {
        self.inner.paths.video_path(id)
    }

    /// Contents of a finished video
    pub async fn read_video(&self, id: Uuid) -> Result<Vec<u8>, JobError> {
        let job = self.get(id)?;
        if job.status != JobStatus::Ready {
            return Err(JobError::InvalidState(format!(
                "Video {} is not ready (current: {})",
                id, job.status
            )));
        }

        let bytes = tokio::fs::read(self.video_path(id)).await?;
        Ok(bytes)
    }

    /// Remove a finished or failed job and its video
    pub async fn delete(&self, id: Uuid) -> Result<Job, JobError> {
        let job = match self
            .inner
            .registry
            .remove_if(id, |job| job.status.is_terminal())
        {
            Removal::Removed(job) => job,
            Removal::Rejected(job) => {
                return Err(JobError::InvalidState(format!(
                    "Video {} is still {}",
                    id, job.status
                )));
            }
            Removal::Missing => return Err(JobError::NotFound(id)),
        };

        remove_if_present(&self.video_path(id)).await;
        tracing::info!("Job {} deleted", id);

        Ok(job)
    }

    fn queue(&self) -> MutexGuard<'_, WorkQueue> {
        self.inner.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pop the next job, or mark the worker stopped if there is none
    fn next_job(&self) -> Option<Uuid> {
        let mut queue = self.queue();
        let next = queue.pending.pop_front();
        if next.is_none() {
            queue.draining = false;
        }
        next
    }

    async fn drain(self) {
        while let Some(id) = self.next_job() {
            self.process(id).await;
        }
        tracing::debug!("Queue drained, worker stopping");
    }

    async fn process(&self, id: Uuid) {
        let Some(job) = self.inner.registry.find_by_id(id) else {
            tracing::warn!("Job {} vanished before processing", id);
            return;
        };

        tracing::info!("Job {} started ({} scenes)", id, job.scenes.len());

        let work_dir = self.inner.paths.work_dir(id);
        let output = self.video_path(id);

        let outcome = match tokio::fs::create_dir_all(&work_dir).await {
            Ok(()) => {
                // isolate panics in engines from the worker
                let pipeline = self.inner.pipeline.clone();
                let (work, out) = (work_dir.clone(), output.clone());
                let handle = self
                    .inner
                    .runtime
                    .spawn(async move { pipeline.run(&job, &work, &out).await });
                match handle.await {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(err)) => {
                        tracing::debug!("Job {} stopped during {}", id, err.stage());
                        Err(err.to_string())
                    }
                    Err(err) => Err(format!("pipeline aborted: {}", err)),
                }
            }
            Err(err) => Err(format!(
                "Failed to create working directory {}: {}",
                work_dir.display(),
                err
            )),
        };

        match tokio::fs::remove_dir_all(&work_dir).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!("Failed to clean up {}: {}", work_dir.display(), err),
        }

        match &outcome {
            Ok(()) => tracing::info!("Job {} ready at {}", id, output.display()),
            Err(message) => {
                tracing::error!("Job {} failed: {}", id, message);
                remove_if_present(&output).await;
            }
        }

        self.inner.registry.update(id, |job| job.finished(outcome));
    }
}

fn validate_scenes(scenes: &[SceneInput]) -> Result<(), JobError> {
    if scenes.is_empty() {
        return Err(JobError::ValidationError(
            "At least one scene is required".to_string(),
        ));
    }

    if let Some(index) = scenes.iter().position(|s| s.text.trim().is_empty()) {
        return Err(JobError::ValidationError(format!(
            "Scene {} has no text",
            index + 1
        )));
    }

    Ok(())
}

async fn remove_if_present(path: &std::path::Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => tracing::warn!("Failed to remove {}: {}", path.display(), err),
    }
}
