// src/discovery.rs
//! Discovery loop: find cards, dedup by identity key, fetch + render once per key.
//!
//! Per key: `Unseen -> Marked (fetch in flight) -> Rendered | Unrendered`.
//! Nothing goes back to `Unseen` and there is no retry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use metrics::{counter, gauge};
use tokio::task::JoinHandle;

use crate::config::InjectorConfig;
use crate::dom::{Document, NodeId};
use crate::identity::{self, IdentityKey, RequestTarget};
use crate::page;
use crate::ratings::{DynFetcher, MediaType, RatingBundle};
use crate::render::{self, RenderOutcome};
use crate::telemetry;
use crate::tracker::ProcessedSet;

pub struct Injector {
    config: InjectorConfig,
    doc: Arc<dyn Document>,
    fetcher: DynFetcher,
    processed: ProcessedSet,
    initialized: AtomicBool,
}

impl Injector {
    pub fn new(
        config: InjectorConfig,
        doc: Arc<dyn Document>,
        fetcher: DynFetcher,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            doc,
            fetcher,
            processed: ProcessedSet::new(),
            initialized: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    /// One-time setup before the first scan. Safe to call repeatedly.
    pub fn init(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        telemetry::ensure_metrics_described();
        if render::install_styles(self.doc.as_ref()) {
            tracing::debug!(
                target: "badges",
                fetcher = self.fetcher.name(),
                "badge styles injected"
            );
        }
    }

    /// One pass over every card currently in the document.
    ///
    /// Resolving and marking happen synchronously, before any task is
    /// spawned, so overlapping scans never fetch the same key twice.
    /// Must be called from within a tokio runtime. Returns the spawned
    /// fetch/render tasks.
    pub fn scan(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        counter!(telemetry::SCANS_TOTAL).increment(1);

        let cards = self.doc.query_all(&page::CARD);
        let mut tasks = Vec::new();
        for card in &cards {
            let Some((key, target)) = identity::resolve(self.doc.as_ref(), *card) else {
                continue;
            };
            if !self.processed.try_mark(&key) {
                continue;
            }
            self.doc.set_attribute(*card, page::ATTR_PROCESSED, "true");
            tracing::debug!(
                target: "badges",
                key = %key,
                catalog_id = %target.catalog_id,
                media_type = %target.media_type,
                "processing card"
            );
            counter!(telemetry::CARDS_DISPATCHED_TOTAL).increment(1);

            let this = Arc::clone(self);
            let card = *card;
            tasks.push(tokio::spawn(async move {
                this.enrich(card, key, target).await;
            }));
        }

        gauge!(telemetry::PROCESSED_KEYS).set(self.processed.len() as f64);
        tracing::trace!(
            target: "badges",
            cards = cards.len(),
            dispatched = tasks.len(),
            "scan finished"
        );
        tasks
    }

    async fn enrich(&self, card: NodeId, key: IdentityKey, target: RequestTarget) {
        let media_type = MediaType::parse(&target.media_type);
        let fetched = self
            .fetcher
            .fetch_ratings(&target.catalog_id, &media_type)
            .await
            .and_then(RatingBundle::non_empty);

        let Some(bundle) = fetched else {
            counter!(telemetry::FETCH_EMPTY_TOTAL).increment(1);
            tracing::debug!(target: "badges", key = %key, "no ratings for card");
            return;
        };

        match render::render(self.doc.as_ref(), card, &bundle) {
            RenderOutcome::Rendered(n) => {
                counter!(telemetry::RENDERED_TOTAL).increment(1);
                tracing::debug!(target: "badges", key = %key, badges = n, "badges rendered");
            }
            other => {
                tracing::trace!(
                    target: "badges",
                    key = %key,
                    outcome = ?other,
                    "nothing rendered"
                );
            }
        }
    }

    /// Run forever: a scan on every timer tick (the first one immediately)
    /// and on every child-list mutation of the document.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        self.init();
        let mut mutations = self.doc.mutations();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.poll_interval());
            let mut watching = true;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    changed = mutations.changed(), if watching => {
                        if changed.is_err() {
                            tracing::warn!(
                                target: "badges",
                                "mutation source closed; polling only"
                            );
                            watching = false;
                            continue;
                        }
                    }
                }
                self.scan();
            }
        })
    }
}
