//! Full theme replacement.
//!
//! A `themes.updated` event carries the complete theme. The shop directory is
//! cleared (everything except `.git`) and rebuilt from the event's templates
//! and assets, so the result holds exactly the files the event lists.
//!
//! A failure partway through aborts the replace and leaves the directory
//! partially rebuilt; the next successful replace clears it again.

use std::path::Path;

use tracing::{debug, info};

use crate::commit::GIT_DIR;
use crate::fetch::FileFetcher;
use crate::webhooks::Document;

use super::{HandlerError, Result, write_asset, write_template};

/// File name reported for a theme replace in commit messages.
pub const THEME_FILE_NAME: &str = "theme";

/// Replaces the shop directory's contents with the theme item's templates and assets.
pub async fn replace_theme<F: FileFetcher>(
    dir: &Path,
    item: Document<'_>,
    fetcher: &F,
) -> Result<String> {
    let templates = item.get_array(&["_embedded", "templates"])?;
    // An absent or unreadable asset collection means a theme without assets.
    let assets = match item.get_array(&["_embedded", "assets"]) {
        Ok(assets) => assets,
        Err(e) => {
            debug!(reason = %e, "Theme has no asset collection");
            Vec::new()
        }
    };

    let removed = purge_dir(dir).await?;
    debug!(removed, "Cleared shop directory");

    for template in &templates {
        write_template(dir, *template).await?;
    }
    for asset in &assets {
        write_asset(dir, *asset, fetcher).await?;
    }

    info!(
        dir = %dir.display(),
        templates = templates.len(),
        assets = assets.len(),
        "Replaced theme"
    );
    Ok(THEME_FILE_NAME.to_string())
}

/// Removes every entry directly under `dir` except the git metadata directory.
async fn purge_dir(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(HandlerError::io(dir))?;
    while let Some(entry) = entries.next_entry().await.map_err(HandlerError::io(dir))? {
        if entry.file_name() == GIT_DIR {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type().await.map_err(HandlerError::io(&path))?;
        if file_type.is_dir() {
            tokio::fs::remove_dir_all(&path)
                .await
                .map_err(HandlerError::io(&path))?;
        } else {
            tokio::fs::remove_file(&path)
                .await
                .map_err(HandlerError::io(&path))?;
        }
        removed += 1;
    }
    Ok(removed)
}
