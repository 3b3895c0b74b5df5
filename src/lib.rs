//! Theme Mirror - mirrors theme-editor change events into per-shop git repositories.
//!
//! Each accepted event becomes a filesystem mutation in the shop's working
//! directory (`<base>/<shop>` or `<base>/<shop>-dev` for draft themes)
//! followed by one commit, so the repository history records every edit.

pub mod commit;
pub mod config;
pub mod fetch;
pub mod handlers;
pub mod layout;
pub mod server;
pub mod types;
pub mod webhooks;
pub mod worker;

#[cfg(test)]
mod test_utils;
