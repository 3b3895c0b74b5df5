//! Template writes and deletes.

use std::path::Path;

use tracing::debug;

use crate::webhooks::Document;

use super::{Result, ensure_parent, remove_file, safe_join, write_file};

/// Writes a template item (`file_name`, `body`) into the shop directory.
///
/// Create and update are the same full overwrite.
pub async fn write_template(dir: &Path, item: Document<'_>) -> Result<String> {
    let file_name = item.get_str(&["file_name"])?;
    let body = item.get_str(&["body"])?;

    let path = safe_join(dir, file_name)?;
    ensure_parent(&path).await?;
    write_file(&path, body.as_bytes()).await?;

    debug!(file = file_name, bytes = body.len(), "Wrote template");
    Ok(file_name.to_string())
}

/// Removes the template named by the payload's `item_slug`.
pub async fn delete_template(dir: &Path, payload: Document<'_>) -> Result<String> {
    let file_name = payload.get_str(&["item_slug"])?;
    remove_file(&safe_join(dir, file_name)?).await?;
    Ok(file_name.to_string())
}
