// src/lib.rs
//! Rating badges for media-library discover cards.
//!
//! Pipeline: [`discovery::Injector`] scans the host [`dom::Document`] for
//! cards, [`identity`] maps each to a stable key, [`tracker`] admits every
//! key once, [`ratings`] fetches scores and [`render`] attaches the overlay.

pub mod config;
pub mod discovery;
pub mod dom;
pub mod identity;
pub mod page;
pub mod ratings;
pub mod render;
pub mod telemetry;
pub mod tracker;

// ---- Re-exports for stable public API ----
pub use crate::config::InjectorConfig;
pub use crate::discovery::Injector;
pub use crate::dom::{Document, MemoryDocument};
pub use crate::ratings::{MediaType, RatingBundle, RatingFetcher, RatingSource, SeerrClient};

use std::sync::Arc;

use tokio::task::JoinHandle;

/// Wire the production fetcher to `doc` and start the discovery loop.
/// Call from within a tokio runtime, after tracing init.
pub fn start(
    config: InjectorConfig,
    doc: Arc<dyn Document>,
) -> anyhow::Result<(Arc<Injector>, JoinHandle<()>)> {
    let fetcher = Arc::new(SeerrClient::new(&config)?);
    let injector = Injector::new(config, doc, fetcher);
    let handle = Arc::clone(&injector).spawn();
    tracing::info!(target: "badges", "rating badge injector started");
    Ok((injector, handle))
}
