//! Shared test fixtures: event builders, a canned-content fetcher and a
//! snapshotter that always fails.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use serde_json::{Value, json};
use tokio_util::io::StreamReader;

use crate::commit::{CommitError, CommitMessage, CommitResult, Snapshotter};
use crate::fetch::{AssetStream, FetchError, FileFetcher};
use crate::webhooks::{ThemeEvent, parse_event};

pub const LOGO_URL: &str = "https://cdn.com/logo.png";

/// Parses a JSON value the way the HTTP boundary would.
pub fn event_from_json(value: Value) -> ThemeEvent {
    parse_event(&serde_json::to_vec(&value).unwrap()).unwrap()
}

pub fn template_event(
    shop: &str,
    verb: &str,
    file_name: &str,
    body: &str,
    seq: i64,
) -> ThemeEvent {
    event_from_json(json!({
        "sequence": seq,
        "shop_subdomain": shop,
        "topic": format!("themes.updated.templates.{}", verb),
        "user_name": "Joe Bloggs",
        "user_id": 123,
        "created_on": "2018-08-10T20:00:00",
        "_embedded": {
            "item": { "file_name": file_name, "body": body }
        }
    }))
}

pub fn asset_event(shop: &str, file_name: &str, href: &str, seq: i64) -> ThemeEvent {
    event_from_json(json!({
        "sequence": seq,
        "shop_subdomain": shop,
        "topic": "themes.updated.assets.created",
        "user_name": "Joe Bloggs",
        "user_id": 123,
        "created_on": "2018-08-10T20:00:00",
        "_embedded": {
            "item": {
                "file_name": file_name,
                "_links": { "file": { "href": href } }
            }
        }
    }))
}

pub fn delete_event(shop: &str, entity: &str, slug: &str, seq: i64) -> ThemeEvent {
    event_from_json(json!({
        "sequence": seq,
        "shop_subdomain": shop,
        "topic": format!("themes.updated.{}.deleted", entity),
        "user_name": "Joe Bloggs",
        "user_id": 123,
        "item_slug": slug
    }))
}

pub fn theme_event(shop: &str, production: bool, seq: i64) -> ThemeEvent {
    event_from_json(json!({
        "sequence": seq,
        "shop_subdomain": shop,
        "topic": "themes.updated",
        "user_name": "Joe Bloggs",
        "user_id": 123,
        "created_on": "2018-08-10T20:00:00",
        "_embedded": {
            "item": {
                "production": production,
                "_embedded": {
                    "templates": [
                        { "file_name": "foo.html", "body": "Some HTML code here" }
                    ],
                    "assets": [
                        {
                            "file_name": "logo.png",
                            "_links": { "file": { "href": LOGO_URL } }
                        }
                    ]
                }
            }
        }
    }))
}

enum Canned {
    Bytes(&'static [u8]),
    Broken,
}

/// Serves fixed bytes per URL; unknown URLs fail with a 404 [`FetchError::Status`].
#[derive(Default)]
pub struct StaticFetcher {
    files: HashMap<String, Canned>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, bytes: &'static [u8]) -> Self {
        self.files.insert(url.to_string(), Canned::Bytes(bytes));
        self
    }

    /// Serves a few bytes for `url` and then fails mid-stream.
    pub fn with_broken(mut self, url: &str) -> Self {
        self.files.insert(url.to_string(), Canned::Broken);
        self
    }
}

impl FileFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<AssetStream, FetchError> {
        match self.files.get(url) {
            Some(Canned::Bytes(bytes)) => Ok(Box::pin(io::Cursor::new(*bytes))),
            Some(Canned::Broken) => {
                let chunks: Vec<io::Result<&'static [u8]>> = vec![
                    Ok(&b"partial"[..]),
                    Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
                ];
                Ok(Box::pin(StreamReader::new(futures::stream::iter(chunks))))
            }
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            }),
        }
    }
}

/// Rejects every snapshot as if git had exited non-zero.
pub struct FailingSnapshotter;

impl Snapshotter for FailingSnapshotter {
    fn snapshot(&self, _dir: &Path, message: &CommitMessage) -> CommitResult<()> {
        Err(CommitError::CommandFailed {
            command: format!("git commit -m {message}"),
            stderr: "fatal: simulated failure".to_string(),
        })
    }
}
