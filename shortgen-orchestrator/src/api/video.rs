//! Video API Handlers
//!
//! HTTP endpoints for creating, inspecting, downloading and deleting videos.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use shortgen_core::domain::render::MusicMood;
use shortgen_core::dto::job::{CreateVideo, CreatedVideo, VideoList, VideoStatus, VideoSummary};
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::service::job_service::Orchestrator;

/// POST /api/short-video
/// Queue a new video
pub async fn create_video(
    State(orchestrator): State<Orchestrator>,
    Json(req): Json<CreateVideo>,
) -> ApiResult<(StatusCode, Json<CreatedVideo>)> {
    tracing::info!("Creating video with {} scenes", req.scenes.len());

    let video_id = orchestrator.create_video(req)?;

    Ok((StatusCode::CREATED, Json(CreatedVideo { video_id })))
}

/// GET /api/short-videos
/// List every known video
pub async fn list_videos(State(orchestrator): State<Orchestrator>) -> Json<VideoList> {
    tracing::debug!("Listing videos");

    let videos = orchestrator
        .list_all_videos()
        .into_iter()
        .map(VideoSummary::from)
        .collect();

    Json(VideoList { videos })
}

/// GET /api/short-video/{id}/status
pub async fn get_status(
    State(orchestrator): State<Orchestrator>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<VideoStatus>> {
    let status = orchestrator.status(id)?;
    Ok(Json(VideoStatus { status }))
}

/// GET /api/short-video/{id}
/// Download a finished video
pub async fn get_video(
    State(orchestrator): State<Orchestrator>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    tracing::debug!("Serving video: {}", id);

    let bytes = orchestrator.read_video(id).await?;
    Ok(([(header::CONTENT_TYPE, "video/mp4")], bytes))
}

/// DELETE /api/short-video/{id}
pub async fn delete_video(
    State(orchestrator): State<Orchestrator>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    tracing::info!("Deleting video: {}", id);

    orchestrator.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/music-tags
pub async fn list_music_tags() -> Json<Vec<MusicMood>> {
    Json(MusicMood::ALL.to_vec())
}
