//! On-disk layout of shop working directories.
//!
//! ```text
//! <base>/<shop>/            production theme files (+ .git)
//! <base>/<shop>/assets/     production binary assets
//! <base>/<shop>-dev/        draft theme files (+ .git)
//! <base>/<shop>-dev/assets/ draft binary assets
//! ```
//!
//! Directories are created lazily on the first event for a (shop, variant)
//! pair and never removed.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::DirBuilder;
use tracing::debug;

use crate::types::ShopKey;
use crate::webhooks::ThemeEvent;

/// Suffix appended to the shop directory for draft themes.
pub const DRAFT_SUFFIX: &str = "-dev";

/// Permissions for newly created shop directories (owner only).
#[cfg(unix)]
const SHOP_DIR_MODE: u32 = 0o700;

/// Errors from resolving a shop directory.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The event names no shop.
    #[error("missing shop subdomain")]
    MissingShopKey,

    /// The shop key cannot be used as a directory name.
    #[error("invalid shop subdomain: {0:?}")]
    InvalidShopKey(ShopKey),

    /// Creating the directory failed.
    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Which copy of a shop's theme an event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeVariant {
    Production,
    Draft,
}

impl ThemeVariant {
    fn from_production_flag(production: bool) -> Self {
        if production {
            ThemeVariant::Production
        } else {
            ThemeVariant::Draft
        }
    }

    /// Determines the variant from an event's item.
    ///
    /// Checks `item.production`, then `item._embedded.theme.production`.
    /// Anything unreadable counts as production.
    pub fn of_event(event: &ThemeEvent) -> Self {
        let item = event.item();
        item.get_bool(&["production"])
            .or_else(|_| item.get_bool(&["_embedded", "theme", "production"]))
            .map(Self::from_production_flag)
            .unwrap_or(ThemeVariant::Production)
    }
}

/// Maps events to shop working directories under a base directory.
#[derive(Debug, Clone)]
pub struct ShopLayout {
    base_dir: PathBuf,
}

impl ShopLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        ShopLayout {
            base_dir: base_dir.into(),
        }
    }

    /// Returns the base directory.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns the directory for a shop and variant without touching the filesystem.
    pub fn shop_dir(&self, shop_key: &ShopKey, variant: ThemeVariant) -> PathBuf {
        match variant {
            ThemeVariant::Production => self.base_dir.join(shop_key.as_str()),
            ThemeVariant::Draft => self
                .base_dir
                .join(format!("{}{}", shop_key.as_str(), DRAFT_SUFFIX)),
        }
    }

    /// Returns the shop directory for an event, creating it if needed.
    pub async fn resolve(&self, event: &ThemeEvent) -> Result<PathBuf, LayoutError> {
        if event.shop_key.is_empty() {
            return Err(LayoutError::MissingShopKey);
        }
        if !event.shop_key.is_plain_component() {
            return Err(LayoutError::InvalidShopKey(event.shop_key.clone()));
        }

        let variant = ThemeVariant::of_event(event);
        let dir = self.shop_dir(&event.shop_key, variant);

        create_private_dir_all(&dir).await.map_err(|source| LayoutError::Io {
            path: dir.clone(),
            source,
        })?;

        debug!(shop = %event.shop_key, ?variant, dir = %dir.display(), "Resolved shop directory");
        Ok(dir)
    }
}

async fn create_private_dir_all(path: &Path) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(SHOP_DIR_MODE);
    builder.create(path).await
}
