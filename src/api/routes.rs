//! API Routes
//!
//! Configures the Axum router with all session endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    close_session_handler, get_session_handler, health_handler, join_session_handler,
    keep_alive_handler, leave_session_handler, open_session_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `POST /sessions` - Open a session
/// - `GET /sessions/:id` - Look up a live session
/// - `DELETE /sessions/:id` - Close and remove a session
/// - `POST /sessions/:id/join` - Attach a peer
/// - `POST /sessions/:id/leave` - Detach the peer
/// - `PUT /sessions/:id/keepalive` - Extend the session's lifetime
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/sessions", post(open_session_handler))
        .route(
            "/sessions/:id",
            get(get_session_handler).delete(close_session_handler),
        )
        .route("/sessions/:id/join", post(join_session_handler))
        .route("/sessions/:id/leave", post(leave_session_handler))
        .route("/sessions/:id/keepalive", put(keep_alive_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use crate::sessions::SessionRegistry;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let cache = Cache::new(100, 4, Duration::from_secs(300), Duration::from_secs(1), None);
        create_router(AppState::new(SessionRegistry::new(cache)))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_open_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/sessions")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"id":"room"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/sessions/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
