//! API Module
//!
//! HTTP API layer for the orchestrator.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod video;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::service::job_service::Orchestrator;

/// Create the main API router with all endpoints
pub fn create_router(orchestrator: Orchestrator) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Video endpoints
        .route("/api/short-video", post(video::create_video))
        .route("/api/short-videos", get(video::list_videos))
        .route(
            "/api/short-video/{id}",
            get(video::get_video).delete(video::delete_video),
        )
        .route("/api/short-video/{id}/status", get(video::get_status))
        .route("/api/music-tags", get(video::list_music_tags))
        // Add state and middleware
        .with_state(orchestrator)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::fakes::FakeEngines;
    use crate::service::pipeline::VideoPipeline;
    use crate::storage::{StoragePaths, ensure_directories};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn app(fakes: &FakeEngines) -> (Router, Orchestrator, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let paths = StoragePaths::new(dir.path().to_path_buf());
        ensure_directories(&paths).unwrap();
        let orchestrator = Orchestrator::new(
            paths,
            VideoPipeline::new(fakes.engines(), Duration::from_secs(5)),
            tokio::runtime::Handle::current(),
        );
        (create_router(orchestrator.clone()), orchestrator, dir)
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn create_req(body: Value) -> Request<Body> {
        Request::post("/api/short-video")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn wait_ready(router: &Router, id: &str) {
        for _ in 0..1000 {
            let (_, body) = send(router, get_req(&format!("/api/short-video/{}/status", id))).await;
            let status: Value = serde_json::from_slice(&body).unwrap();
            if status["status"] != "processing" {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("video {} never finished", id);
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _, _dir) = app(&FakeEngines::new());
        let (status, body) = send(&router, get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_create_list_download_delete() {
        let (router, _, _dir) = app(&FakeEngines::new());

        let (status, body) = send(
            &router,
            create_req(json!({
                "scenes": [{ "text": "Hello world", "searchTerms": ["sunrise"] }],
                "config": { "orientation": "landscape", "music": "happy" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: Value = serde_json::from_slice(&body).unwrap();
        let id = created["videoId"].as_str().unwrap().to_string();

        wait_ready(&router, &id).await;

        let (status, body) = send(&router, get_req("/api/short-videos")).await;
        assert_eq!(status, StatusCode::OK);
        let list: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(list["videos"][0]["id"], id.as_str());
        assert_eq!(list["videos"][0]["status"], "ready");

        let response = router
            .clone()
            .oneshot(get_req(&format!("/api/short-video/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "video/mp4");

        let delete = Request::delete(format!("/api/short-video/{}", id))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&router, get_req(&format!("/api/short-video/{}/status", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_video_is_404() {
        let (router, _, _dir) = app(&FakeEngines::new());
        let id = Uuid::new_v4();

        let (status, body) = send(&router, get_req(&format!("/api/short-video/{}/status", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let error: Value = serde_json::from_slice(&body).unwrap();
        assert!(error["error"].as_str().unwrap().contains(&id.to_string()));

        let (status, _) = send(&router, get_req(&format!("/api/short-video/{}", id))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_processing_video_conflicts() {
        let fakes = FakeEngines::new();
        fakes.renderer.set_delay(Duration::from_millis(200));
        let (router, orchestrator, _dir) = app(&fakes);

        let (_, body) = send(
            &router,
            create_req(json!({ "scenes": [{ "text": "slow", "searchTerms": [] }] })),
        )
        .await;
        let created: Value = serde_json::from_slice(&body).unwrap();
        let id = created["videoId"].as_str().unwrap().to_string();

        let (status, _) = send(&router, get_req(&format!("/api/short-video/{}", id))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let delete = Request::delete(format!("/api/short-video/{}", id))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, delete).await;
        assert_eq!(status, StatusCode::CONFLICT);

        wait_ready(&router, &id).await;
        assert_eq!(orchestrator.list_all_videos().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_create_is_400() {
        let (router, _, _dir) = app(&FakeEngines::new());
        let (status, body) = send(&router, create_req(json!({ "scenes": [] }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: Value = serde_json::from_slice(&body).unwrap();
        assert!(error["error"].is_string());
    }

    #[tokio::test]
    async fn test_music_tags() {
        let (router, _, _dir) = app(&FakeEngines::new());
        let (status, body) = send(&router, get_req("/api/music-tags")).await;
        assert_eq!(status, StatusCode::OK);
        let tags: Vec<String> = serde_json::from_slice(&body).unwrap();
        assert_eq!(tags.len(), 12);
        assert!(tags.contains(&"chill".to_string()));
    }
}
