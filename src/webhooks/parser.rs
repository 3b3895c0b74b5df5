//! Theme-editor payload parser.
//!
//! # Parsing Strategy
//!
//! 1. The body must be a non-empty JSON object
//! 2. `topic` must be present and a string; nothing else is required
//! 3. Every other field is extracted best-effort: absent or mistyped values
//!    become empty, because only the handler for a topic knows what it needs
//!
//! In particular a missing `shop_subdomain` still parses. It is reported when
//! the worker resolves the shop directory.

use serde_json::Value;
use thiserror::Error;

use crate::types::{EventId, ShopKey};

use super::document::{Document, FieldError};
use super::events::ThemeEvent;

/// Error type for malformed event bodies.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Request carried no body.
    #[error("Please send a request body")]
    EmptyBody,

    /// Body is not valid JSON.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// Body is valid JSON but not an object.
    #[error("event payload must be a JSON object")]
    NotAnObject,

    /// `topic` is absent or not a string.
    #[error("invalid event: {0}")]
    MissingTopic(FieldError),
}

/// Parses a request body into a [`ThemeEvent`].
///
/// # Examples
///
/// ```
/// use theme_mirror::webhooks::parse_event;
///
/// let body = br#"{
///     "topic": "themes.updated.templates.created",
///     "sequence": 1,
///     "shop_subdomain": "acme",
///     "user_name": "Joe Bloggs",
///     "_embedded": { "item": { "file_name": "foo.html", "body": "<p>hi</p>" } }
/// }"#;
///
/// let event = parse_event(body).unwrap();
/// assert_eq!(event.topic, "themes.updated.templates.created");
/// assert_eq!(event.shop_key.as_str(), "acme");
/// ```
pub fn parse_event(body: &[u8]) -> Result<ThemeEvent, ParseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::EmptyBody);
    }

    let raw: Value = serde_json::from_slice(body)?;
    if !raw.is_object() {
        return Err(ParseError::NotAnObject);
    }

    let doc = Document::new(&raw);
    let topic = doc
        .get_str(&["topic"])
        .map_err(ParseError::MissingTopic)?
        .to_string();

    let event_id = EventId(doc.get_i64(&["sequence"]).unwrap_or_default());
    let actor_name = optional_string(&doc, &["user_name"]);
    let actor_id = doc.get_i64(&["user_id"]).unwrap_or_default();
    let shop_key = ShopKey::new(optional_string(&doc, &["shop_subdomain"]));
    let created_at = optional_string(&doc, &["created_on"]);
    let item = doc
        .get_object(&["_embedded", "item"])
        .map(|d| d.value().clone())
        .unwrap_or(Value::Null);

    Ok(ThemeEvent {
        topic,
        event_id,
        actor_name,
        actor_id,
        shop_key,
        created_at,
        item,
        raw,
    })
}

fn optional_string(doc: &Document<'_>, path: &[&str]) -> String {
    doc.get_str(path).map(str::to_string).unwrap_or_default()
}
