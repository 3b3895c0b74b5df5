//! HTTP server for the theme mirror.
//!
//! # Endpoints
//!
//! - `POST /events` - Accepts theme-editor events (returns 204 No Content)
//! - `GET /` (any path) - Returns a greeting naming the path

use std::sync::Arc;

use tower_http::trace::TraceLayer;

pub mod events;
pub mod root;

pub use events::events_handler;
pub use root::root_handler;

use crate::worker::EventSender;

/// Shared application state.
///
/// This is passed to all handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Producer half of the worker queue.
    sender: EventSender,
}

impl AppState {
    pub fn new(sender: EventSender) -> Self {
        AppState {
            inner: Arc::new(AppStateInner { sender }),
        }
    }

    /// Returns the queue sender.
    pub fn sender(&self) -> &EventSender {
        &self.inner.sender
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router(app_state: AppState) -> axum::Router {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/events", post(events_handler))
        .route("/", get(root_handler))
        .route("/{*path}", get(root_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::worker::{EventReceiver, QUEUE_CAPACITY, channel};

    fn test_app() -> (axum::Router, EventReceiver) {
        let (tx, rx) = channel(QUEUE_CAPACITY);
        (build_router(AppState::new(tx)), rx)
    }

    fn post_events(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/events")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // ─── Root endpoint tests ───

    #[tokio::test]
    async fn root_greets_any_path() {
        let (app, _rx) = test_app();

        let request = Request::builder()
            .uri("/some/where")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Hello, \"/some/where\"");
    }

    #[tokio::test]
    async fn root_decodes_escaped_path() {
        let (app, _rx) = test_app();

        let request = Request::builder()
            .uri("/foo%20bar")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "Hello, \"/foo bar\"");
    }

    #[tokio::test]
    async fn root_greets_slash() {
        let (app, _rx) = test_app();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(body_text(response).await, "Hello, \"/\"");
    }

    // ─── Events endpoint tests ───

    #[tokio::test]
    async fn valid_event_is_enqueued() {
        let (app, mut rx) = test_app();
        let body = json!({
            "topic": "themes.updated.templates.created",
            "sequence": 1,
            "shop_subdomain": "acme",
            "user_name": "Joe Bloggs",
            "_embedded": { "item": { "file_name": "foo.html", "body": "x" } }
        });

        let response = app
            .oneshot(post_events(serde_json::to_vec(&body).unwrap()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let event = rx.try_recv().expect("event should be queued");
        assert_eq!(event.topic, "themes.updated.templates.created");
        assert_eq!(event.shop_key.as_str(), "acme");
    }

    #[tokio::test]
    async fn unknown_topic_is_still_accepted() {
        let (app, mut rx) = test_app();
        let body = json!({ "topic": "themes.published", "shop_subdomain": "acme" });

        let response = app
            .oneshot(post_events(serde_json::to_vec(&body).unwrap()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(rx.try_recv().is_some());
    }

    #[tokio::test]
    async fn activation_echoes_ping_and_is_not_enqueued() {
        let (app, mut rx) = test_app();

        let request = Request::builder()
            .method("POST")
            .uri("/events")
            .header("X-Hook-Ping", "abc123")
            .body(Body::from(r#"{"topic":"activation"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["x-hook-pong"], "abc123");
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn activation_without_ping_has_empty_pong() {
        let (app, mut rx) = test_app();

        let response = app
            .oneshot(post_events(r#"{"topic":"activation"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()["x-hook-pong"], "");
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn empty_body_returns_400() {
        let (app, mut rx) = test_app();

        let response = app.oneshot(post_events(Body::empty())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Please send a request body");
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn invalid_json_returns_400() {
        let (app, mut rx) = test_app();

        let response = app.oneshot(post_events("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn missing_topic_returns_400() {
        let (app, mut rx) = test_app();

        let response = app
            .oneshot(post_events(r#"{"shop_subdomain":"acme"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(rx.try_recv().is_none());
    }

    #[tokio::test]
    async fn closed_queue_returns_503() {
        let (tx, rx) = channel(QUEUE_CAPACITY);
        drop(rx);
        let app = build_router(AppState::new(tx));

        let response = app
            .oneshot(post_events(r#"{"topic":"themes.updated","shop_subdomain":"acme"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn get_on_events_is_not_allowed() {
        let (app, _rx) = test_app();

        let request = Request::builder()
            .uri("/events")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
