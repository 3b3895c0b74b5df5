//! Key-path access into schema-less JSON payloads.
//!
//! Theme-editor payloads are only loosely structured: every handler reads a
//! different handful of fields, and most of the document is irrelevant. A
//! [`Document`] is a borrowed view that answers "give me the string at
//! `_embedded.item.file_name`" and reports exactly which path was missing
//! or mistyped when it can't.

use serde_json::Value;
use thiserror::Error;

/// Error returned when a field lookup fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Nothing exists at the path.
    #[error("missing field: {path}")]
    Missing { path: String },

    /// A value exists at the path but has the wrong JSON type.
    #[error("field {path} is not {expected}")]
    WrongType { path: String, expected: &'static str },
}

impl FieldError {
    fn missing(path: &[&str]) -> Self {
        FieldError::Missing {
            path: path.join("."),
        }
    }

    fn wrong_type(path: &[&str], expected: &'static str) -> Self {
        FieldError::WrongType {
            path: path.join("."),
            expected,
        }
    }

    /// The dotted path that failed.
    pub fn path(&self) -> &str {
        match self {
            FieldError::Missing { path } | FieldError::WrongType { path, .. } => path,
        }
    }
}

/// A read-only view over a JSON value.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    value: &'a Value,
}

impl<'a> Document<'a> {
    pub fn new(value: &'a Value) -> Self {
        Document { value }
    }

    /// Returns the underlying JSON value.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Walks object keys from this document. An empty path is the document itself.
    fn lookup(&self, path: &[&str]) -> Result<&'a Value, FieldError> {
        let mut current = self.value;
        for key in path {
            current = current
                .as_object()
                .and_then(|obj| obj.get(*key))
                .ok_or_else(|| FieldError::missing(path))?;
        }
        Ok(current)
    }

    /// Returns the string at `path`.
    pub fn get_str(&self, path: &[&str]) -> Result<&'a str, FieldError> {
        self.lookup(path)?
            .as_str()
            .ok_or_else(|| FieldError::wrong_type(path, "a string"))
    }

    /// Returns the integer at `path`.
    pub fn get_i64(&self, path: &[&str]) -> Result<i64, FieldError> {
        self.lookup(path)?
            .as_i64()
            .ok_or_else(|| FieldError::wrong_type(path, "an integer"))
    }

    /// Returns the boolean at `path`.
    pub fn get_bool(&self, path: &[&str]) -> Result<bool, FieldError> {
        self.lookup(path)?
            .as_bool()
            .ok_or_else(|| FieldError::wrong_type(path, "a boolean"))
    }

    /// Returns the object at `path` as a nested document.
    pub fn get_object(&self, path: &[&str]) -> Result<Document<'a>, FieldError> {
        let value = self.lookup(path)?;
        if value.is_object() {
            Ok(Document::new(value))
        } else {
            Err(FieldError::wrong_type(path, "an object"))
        }
    }

    /// Returns the array of objects at `path`.
    ///
    /// Every element must be an object; one that isn't fails the whole lookup.
    pub fn get_array(&self, path: &[&str]) -> Result<Vec<Document<'a>>, FieldError> {
        let items = self
            .lookup(path)?
            .as_array()
            .ok_or_else(|| FieldError::wrong_type(path, "an array"))?;

        items
            .iter()
            .map(|item| {
                if item.is_object() {
                    Ok(Document::new(item))
                } else {
                    Err(FieldError::wrong_type(path, "an array of objects"))
                }
            })
            .collect()
    }
}
