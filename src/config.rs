//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

/// Mirrors theme-editor change events into per-shop git repositories.
#[derive(Debug, Clone, Parser)]
#[command(name = "theme-mirror", version, about)]
pub struct Config {
    /// Address to listen on, as `host:port`.
    #[arg(long, env = "THEME_MIRROR_HOST", default_value = "localhost:3004")]
    pub host: String,

    /// Base directory holding one working directory per shop.
    #[arg(long, env = "THEME_MIRROR_DIR", default_value = "./")]
    pub dir: PathBuf,
}
