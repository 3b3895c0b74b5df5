//! Newtype wrappers for domain identifiers.
//!
//! These types keep shop keys and event sequence numbers from being mixed up
//! with arbitrary strings and integers pulled out of a payload.

use std::fmt;

/// A shop identifier (the payload's `shop_subdomain`).
///
/// May be empty: a payload without a shop is still a valid event, and the
/// problem is reported when a directory is resolved for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ShopKey(pub String);

impl ShopKey {
    pub fn new(s: impl Into<String>) -> Self {
        ShopKey(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if the key can be used verbatim as one directory name.
    ///
    /// Rejects separators, NUL bytes, `.` and `..`.
    pub fn is_plain_component(&self) -> bool {
        let key = self.as_str();
        !key.is_empty()
            && key != "."
            && key != ".."
            && !key.contains('/')
            && !key.contains('\\')
            && !key.contains('\0')
    }
}

impl fmt::Display for ShopKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The source system's sequence number for an event.
///
/// Only ever rendered into commit messages; never used for ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EventId(pub i64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
