//! Event ingestion endpoint.
//!
//! Parses the body into a [`ThemeEvent`](crate::webhooks::ThemeEvent),
//! answers the activation handshake inline, and hands every other event to
//! the worker queue. The response only acknowledges receipt; the outcome of
//! processing is never reported back to the caller.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::AppState;
use crate::webhooks::{ParseError, TopicAction, parse_event};

/// Header carrying the activation challenge.
pub const HEADER_PING: &str = "x-hook-ping";
/// Header echoing the challenge back.
pub const HEADER_PONG: &str = "x-hook-pong";

/// Errors returned to the event source.
#[derive(Debug, Error)]
pub enum EventsError {
    /// The body is empty or not a usable event.
    #[error(transparent)]
    Malformed(#[from] ParseError),

    /// The worker has stopped.
    #[error("event queue is closed")]
    QueueClosed,
}

impl IntoResponse for EventsError {
    fn into_response(self) -> Response {
        let status = match &self {
            EventsError::Malformed(_) => StatusCode::BAD_REQUEST,
            EventsError::QueueClosed => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, self.to_string()).into_response()
    }
}

/// Event handler.
///
/// # Response
///
/// - 204 No Content: event accepted (or activation answered)
/// - 400 Bad Request: empty body or malformed event
/// - 503 Service Unavailable: the worker is no longer consuming events
///
/// # Example
///
/// ```ignore
/// POST /events HTTP/1.1
/// X-Hook-Ping: 5f2b
///
/// {"topic": "activation"}
///
/// HTTP/1.1 204 No Content
/// X-Hook-Pong: 5f2b
/// ```
pub async fn events_handler(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, EventsError> {
    let event = parse_event(&body).inspect_err(|e| {
        debug!(error = %e, bytes = body.len(), "Rejected event body");
    })?;

    if event.action() == TopicAction::Activation {
        let ping = headers
            .get(HEADER_PING)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(""));
        info!(shop = %event.shop_key, "Answered activation ping");
        return Ok((StatusCode::NO_CONTENT, [(HEADER_PONG, ping)]).into_response());
    }

    debug!(
        topic = %event.topic,
        shop = %event.shop_key,
        event_id = %event.event_id,
        "Accepted event"
    );

    app_state.sender().enqueue(event).await.map_err(|closed| {
        warn!(
            topic = %closed.0.topic,
            event_id = %closed.0.event_id,
            "Event queue closed, rejecting event"
        );
        EventsError::QueueClosed
    })?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
