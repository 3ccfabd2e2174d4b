//! HTTP submission gateway.
//!
//! Receives notification requests, constructs jobs and offers them to the
//! worker pool. This is the admission boundary: a caller only ever learns
//! whether its job was queued or shed, never whether delivery eventually
//! succeeded. Execution results have no channel back to the request.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use notiq_core::{Job, Submission, WorkerPool};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SendNotificationRequest {
    pub kind: String,
    /// Carried through to the handler untouched; the gateway never
    /// interprets it.
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub message: &'static str,
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Builds the gateway router around a started pool.
pub fn router(pool: Arc<WorkerPool>) -> Router {
    Router::new()
        .route("/notifications", post(send_notification))
        .route("/healthz", get(healthz))
        .with_state(pool)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tracing::instrument(skip_all, fields(kind = %req.kind))]
async fn send_notification(
    State(pool): State<Arc<WorkerPool>>,
    Json(req): Json<SendNotificationRequest>,
) -> Result<(StatusCode, Json<QueuedResponse>), (StatusCode, Json<ErrorResponse>)> {
    if req.kind.is_empty() {
        return Err(bad_request("kind must not be empty"));
    }

    let payload = serde_json::to_vec(&req.payload)
        .map_err(|e| bad_request(&format!("unserializable payload: {e}")))?;

    let job_id = Uuid::now_v7().to_string();
    let job = Job::new(job_id, req.kind, Bytes::from(payload));

    match pool.submit(job) {
        Submission::Accepted { job_id } => {
            tracing::debug!("Queued job {job_id}");
            Ok((
                StatusCode::ACCEPTED,
                Json(QueuedResponse {
                    message: "notification queued",
                    job_id,
                }),
            ))
        }
        Submission::Rejected => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "server busy, try again later".to_string(),
            }),
        )),
    }
}

fn bad_request(error: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::handlers::builtin_registry;
    use axum::body::Body;
    use axum::http::Request;
    use axum::http::header::CONTENT_TYPE;
    use tower::ServiceExt;

    fn started_pool(workers: usize, capacity: usize) -> Arc<WorkerPool> {
        let pool =
            Arc::new(WorkerPool::new(workers, capacity, builtin_registry()).expect("valid config"));
        pool.start().expect("start");
        pool
    }

    fn post_notification(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/notifications")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request builds")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body read");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn queues_notification_and_echoes_job_id() {
        let pool = started_pool(2, 4);
        let app = router(Arc::clone(&pool));

        let response = app
            .oneshot(post_notification(
                r#"{"kind": "email", "payload": {"to": "user@example.com"}}"#,
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let body = body_json(response).await;
        assert_eq!(body["message"], "notification queued");
        assert!(body["job_id"].as_str().is_some_and(|id| !id.is_empty()));

        pool.shutdown().await;
    }

    #[tokio::test]
    async fn busy_pool_maps_to_service_unavailable() {
        // A pool that was never started rejects every submission, which is
        // exactly the admission path a saturated queue takes.
        let pool = Arc::new(
            WorkerPool::new(2, 4, builtin_registry()).expect("valid config"),
        );
        let app = router(pool);

        let response = app
            .oneshot(post_notification(r#"{"kind": "email"}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"], "server busy, try again later");
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let pool = started_pool(1, 2);
        let app = router(Arc::clone(&pool));

        let response = app
            .oneshot(post_notification("{not json"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        pool.shutdown().await;
    }

    #[tokio::test]
    async fn empty_kind_is_a_bad_request() {
        let pool = started_pool(1, 2);
        let app = router(Arc::clone(&pool));

        let response = app
            .oneshot(post_notification(r#"{"kind": ""}"#))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "kind must not be empty");
        pool.shutdown().await;
    }

    #[tokio::test]
    async fn healthz_reports_ok() {
        let pool = started_pool(1, 2);
        let app = router(Arc::clone(&pool));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        pool.shutdown().await;
    }
}
