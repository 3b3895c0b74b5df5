//! Typed theme-editor events.

use serde_json::Value;

use crate::types::{EventId, ShopKey};

use super::document::Document;
use super::parser::{ParseError, parse_event};
use super::topic::TopicAction;

/// One change notification from the theme editor.
///
/// Built once per request by [`parse_event`](super::parse_event) and never
/// mutated afterwards. Only `topic` is guaranteed to be meaningful; every
/// other field falls back to an empty value when the payload lacks it, and
/// the handler for the topic decides what it actually needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeEvent {
    /// Dot-segmented event kind, e.g. `themes.updated.assets.created`.
    pub topic: String,

    /// Source sequence number (`sequence`).
    pub event_id: EventId,

    /// Who triggered the change (`user_name`).
    pub actor_name: String,

    /// Numeric id of the actor (`user_id`).
    pub actor_id: i64,

    /// Target shop (`shop_subdomain`). Empty when absent.
    pub shop_key: ShopKey,

    /// Opaque creation timestamp (`created_on`), passed through unparsed.
    pub created_at: String,

    /// The embedded entity (`_embedded.item`), or null.
    pub item: Value,

    /// The full payload. Delete events only carry `item_slug` at the top level.
    pub raw: Value,
}

impl ThemeEvent {
    /// Parses a request body. See [`parse_event`].
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        parse_event(body)
    }

    /// The dispatch action for this event's topic.
    pub fn action(&self) -> TopicAction {
        TopicAction::from_topic(&self.topic)
    }

    /// The embedded item as a document.
    pub fn item(&self) -> Document<'_> {
        Document::new(&self.item)
    }

    /// The whole payload as a document.
    pub fn payload(&self) -> Document<'_> {
        Document::new(&self.raw)
    }
}
