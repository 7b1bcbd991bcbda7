//! Route assembly for the public-facing server.

use std::sync::Arc;

use axum::extract::Path;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;

use crate::ratelimit::RateLimiter;

use super::middleware::throttle;

/// Build the application router with the throttle layer applied.
///
/// The throttle wraps every route; protected-path matching happens inside
/// the middleware, so adding a prefix to the policy is enough to cover a new
/// surface.
pub fn router(limiter: Arc<RateLimiter>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/image/{id}", get(view_image))
        .layer(middleware::from_fn_with_state(limiter, throttle))
        .layer(TraceLayer::new_for_http())
}

/// Liveness endpoint.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Public image view endpoint. Stands in for the hosted application's page
/// rendering, which lives downstream of the throttle.
async fn view_image(Path(id): Path<String>) -> impl IntoResponse {
    Json(serde_json::json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_endpoint_responds() {
        let app = router(Arc::new(RateLimiter::new(Default::default())));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_image_view_echoes_id() {
        let app = router(Arc::new(RateLimiter::new(Default::default())));

        let response = app
            .oneshot(Request::get("/image/abc123").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["id"], "abc123");
    }
}
