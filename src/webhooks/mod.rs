//! Theme-editor webhook events.
//!
//! This module provides:
//! - A key-path view over loosely structured JSON payloads
//! - Parsing of request bodies into typed [`ThemeEvent`] values
//! - The topic dispatch table

pub mod document;
pub mod events;
pub mod parser;
pub mod topic;

pub use document::{Document, FieldError};
pub use events::ThemeEvent;
pub use parser::{ParseError, parse_event};
pub use topic::{ACTIVATION_TOPIC, THEME_UPDATED_TOPIC, TopicAction, topic_verb};
