//! Service Module
//!
//! Business logic layer for the orchestrator.
//! Services coordinate the job registry, the work queue and the pipeline.

pub mod job;
pub mod pipeline;

// Re-export for convenience
pub use job as job_service;
