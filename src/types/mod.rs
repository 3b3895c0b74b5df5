//! Core identifier types shared across the pipeline.

pub mod ids;

pub use ids::{EventId, ShopKey};
