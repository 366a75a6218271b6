//! Job Repository
//!
//! In-memory registry of every job the orchestrator has accepted.
//!
//! Records are replaced whole under the write lock, so readers see a job
//! either entirely before or entirely after an update. The lock is never held
//! across an `.await`.

use shortgen_core::domain::job::Job;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

/// Outcome of a conditional removal
#[derive(Debug)]
pub enum Removal {
    Removed(Job),
    Rejected(Job),
    Missing,
}

/// Thread-safe job registry
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<Uuid, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new job
    pub fn insert(&self, job: Job) {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        jobs.insert(job.id, job);
    }

    /// Find a job by ID
    pub fn find_by_id(&self, id: Uuid) -> Option<Job> {
        let jobs = self.jobs.read().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&id).cloned()
    }

    /// Snapshot of all jobs, oldest first
    pub fn list_all(&self) -> Vec<Job> {
        let jobs = self.jobs.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<Job> = jobs.values().cloned().collect();
        all.sort_by_key(|job| job.requested_at);
        all
    }

    /// Replace a job with `update(job)` in one step
    ///
    /// Returns the updated job, or `None` if the ID is unknown.
    pub fn update(&self, id: Uuid, update: impl FnOnce(Job) -> Job) -> Option<Job> {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        let current = jobs.remove(&id)?;
        let updated = update(current);
        jobs.insert(id, updated.clone());
        Some(updated)
    }

    /// Remove a job only if `allow` accepts it
    pub fn remove_if(&self, id: Uuid, allow: impl FnOnce(&Job) -> bool) -> Removal {
        let mut jobs = self.jobs.write().unwrap_or_else(PoisonError::into_inner);
        match jobs.get(&id) {
            None => Removal::Missing,
            Some(job) if !allow(job) => Removal::Rejected(job.clone()),
            Some(_) => match jobs.remove(&id) {
                Some(job) => Removal::Removed(job),
                None => Removal::Missing,
            },
        }
    }
}
