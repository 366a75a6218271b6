//! Core domain types
//!
//! These types are shared between the orchestrator (which owns and mutates
//! jobs), the clip sourcing crate and the CLI.

pub mod caption;
pub mod clip;
pub mod job;
pub mod render;
