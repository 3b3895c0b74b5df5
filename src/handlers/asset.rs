//! Asset downloads and deletes.
//!
//! Assets live under `assets/` in the shop directory. A write always
//! re-downloads the full content; the body is streamed into a hidden
//! sibling file which replaces the destination only once the stream has
//! completed, so a failed download never leaves a truncated asset behind.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::fetch::{AssetStream, FileFetcher};
use crate::webhooks::Document;

use super::{HandlerError, Result, ensure_parent, remove_file, safe_join};

/// Subdirectory of the shop directory holding binary assets.
pub const ASSETS_DIR: &str = "assets";

/// Downloads an asset item (`file_name`, `_links.file.href`) into `assets/`.
pub async fn write_asset<F: FileFetcher>(
    dir: &Path,
    item: Document<'_>,
    fetcher: &F,
) -> Result<String> {
    let file_name = item.get_str(&["file_name"])?;
    let href = item.get_str(&["_links", "file", "href"])?;

    let path = safe_join(&dir.join(ASSETS_DIR), file_name)?;
    ensure_parent(&path).await?;

    let mut body = fetcher.fetch(href).await?;

    let partial = partial_path(&path);
    let written = match stream_to_file(&mut body, &partial).await {
        Ok(n) => n,
        Err(e) => {
            // Best effort: the stream error is what gets reported.
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
    };
    tokio::fs::rename(&partial, &path)
        .await
        .map_err(HandlerError::io(&path))?;

    debug!(file = file_name, href, bytes = written, "Wrote asset");
    Ok(file_name.to_string())
}

/// Removes the asset named by the payload's `item_slug`.
pub async fn delete_asset(dir: &Path, payload: Document<'_>) -> Result<String> {
    let file_name = payload.get_str(&["item_slug"])?;
    remove_file(&safe_join(&dir.join(ASSETS_DIR), file_name)?).await?;
    Ok(file_name.to_string())
}

/// `assets/logo.png` downloads into `assets/.logo.png.download`.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".download");
    path.with_file_name(name)
}

async fn stream_to_file(body: &mut AssetStream, path: &Path) -> Result<u64> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(HandlerError::io(path))?;
    let written = tokio::io::copy(body, &mut file)
        .await
        .map_err(HandlerError::io(path))?;
    file.flush().await.map_err(HandlerError::io(path))?;
    Ok(written)
}
