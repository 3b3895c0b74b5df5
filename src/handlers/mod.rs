//! Filesystem mutations for theme events.
//!
//! One handler per (entity, action) pair. Each handler takes the resolved
//! shop directory plus the part of the event it reads (the embedded item, or
//! the whole payload for deletes, which only carry `item_slug`) and returns
//! the affected file name for the commit message.
//!
//! File names come straight from payloads, so every one is checked to be a
//! relative path of plain components, none of them the git metadata
//! directory, before it is joined onto the shop directory.

pub mod asset;
pub mod template;
pub mod theme;

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::commit::GIT_DIR;
use crate::fetch::{FetchError, FileFetcher};
use crate::webhooks::{FieldError, ThemeEvent, TopicAction};

pub use asset::{ASSETS_DIR, delete_asset, write_asset};
pub use template::{delete_template, write_template};
pub use theme::{THEME_FILE_NAME, replace_theme};

/// Permissions for files written from templates (`rw-r--r--`).
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Errors from applying a mutation.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A field the handler needs is absent or mistyped.
    #[error("{0}")]
    MissingField(#[from] FieldError),

    /// A file name would escape the shop directory.
    #[error("unsafe file name: {0:?}")]
    UnsafePath(String),

    /// The file to delete does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Filesystem operation failed.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Downloading an asset failed.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
}

impl HandlerError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> HandlerError + '_ {
        move |source| HandlerError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, HandlerError>;

/// Applies the mutation for `action` to `dir`.
///
/// Returns the affected file name, or `None` when the action mutates nothing.
pub async fn apply_action<F: FileFetcher>(
    action: TopicAction,
    dir: &Path,
    event: &ThemeEvent,
    fetcher: &F,
) -> Result<Option<String>> {
    let file_name = match action {
        TopicAction::ReplaceTheme => replace_theme(dir, event.item(), fetcher).await?,
        TopicAction::WriteTemplate => write_template(dir, event.item()).await?,
        TopicAction::DeleteTemplate => delete_template(dir, event.payload()).await?,
        TopicAction::WriteAsset => write_asset(dir, event.item(), fetcher).await?,
        TopicAction::DeleteAsset => delete_asset(dir, event.payload()).await?,
        TopicAction::Activation | TopicAction::Ignore => return Ok(None),
    };
    Ok(Some(file_name))
}

/// Joins a payload-supplied relative file name onto `dir`.
///
/// Rejects anything but plain components, and any component naming the git
/// metadata directory (compared case-insensitively).
pub(crate) fn safe_join(dir: &Path, file_name: &str) -> Result<PathBuf> {
    let relative = Path::new(file_name);
    let plain = !file_name.is_empty()
        && !file_name.contains('\0')
        && relative.components().all(|c| match c {
            Component::Normal(name) => !name.eq_ignore_ascii_case(GIT_DIR),
            _ => false,
        });

    if plain {
        Ok(dir.join(relative))
    } else {
        Err(HandlerError::UnsafePath(file_name.to_string()))
    }
}

/// Creates the parent directory of `path` if it is missing.
pub(crate) async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(HandlerError::io(parent))?;
    }
    Ok(())
}

/// Overwrites `path` with `contents`, creating it with [`FILE_MODE`].
pub(crate) async fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);

    let mut file = options.open(path).await.map_err(HandlerError::io(path))?;
    file.write_all(contents)
        .await
        .map_err(HandlerError::io(path))?;
    file.flush().await.map_err(HandlerError::io(path))?;
    Ok(())
}

/// Removes a single file, reporting a missing file as [`HandlerError::NotFound`].
pub(crate) async fn remove_file(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed file");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(HandlerError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(HandlerError::io(path)(e)),
    }
}
