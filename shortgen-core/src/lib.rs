//! Shortgen Core
//!
//! Core types shared by the short-video generation services.
//!
//! This crate contains:
//! - Domain types: jobs, scenes, render settings, clip candidates, captions
//! - DTOs: request/response shapes exchanged with the orchestrator API

pub mod domain;
pub mod dto;
