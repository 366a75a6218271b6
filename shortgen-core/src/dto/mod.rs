//! Data Transfer Objects
//!
//! Lightweight request/response shapes for the orchestrator HTTP API.

pub mod job;
