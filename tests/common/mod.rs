// tests/common/mod.rs
// Shared builders: discover cards as the host renders them, and a scripted fetcher.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use rating_badge_injector::dom::{Fragment, NodeId};
use rating_badge_injector::ratings::{MediaType, RatingBundle, RatingFetcher};
use rating_badge_injector::{page, MemoryDocument};

pub fn section(class: &str) -> Fragment {
    Fragment::element("div").class(format!("verticalSection {class}"))
}

pub fn card(index: usize, catalog_id: &str, media_type: &str) -> Fragment {
    Fragment::element("div")
        .class("card discover-card")
        .attr(page::ATTR_INDEX, index.to_string())
        .child(Fragment::element("div").class("cardScalable"))
        .child(
            Fragment::element("button")
                .class("discover-requestbutton")
                .attr(page::ATTR_CATALOG_ID, catalog_id)
                .attr(page::ATTR_MEDIA_TYPE, media_type),
        )
}

/// Card without a request control (e.g. a placeholder while loading).
pub fn bare_card(index: usize) -> Fragment {
    Fragment::element("div")
        .class("card discover-card")
        .attr(page::ATTR_INDEX, index.to_string())
        .child(Fragment::element("div").class("cardScalable"))
}

/// Attach a section holding `cards` to the body; returns the card handles.
pub fn mount(doc: &MemoryDocument, class: &str, cards: Vec<Fragment>) -> Vec<NodeId> {
    let sec = doc.append(doc.body(), cards.into_iter().fold(section(class), Fragment::child));
    doc.children(sec)
}

/// Scalable container of a mounted card.
pub fn scalable(doc: &MemoryDocument, card: NodeId) -> NodeId {
    doc.children(card)[0]
}

/// Badge texts of the card's overlay, in DOM order. Empty when no overlay.
pub fn badge_texts(doc: &MemoryDocument, card: NodeId) -> Vec<String> {
    let target = scalable(doc, card);
    match doc.children(target).first() {
        Some(&overlay) => doc
            .children(overlay)
            .into_iter()
            .filter_map(|b| doc.text(b))
            .collect(),
        None => Vec::new(),
    }
}

/// Fetcher answering from a fixed table, counting calls.
pub struct ScriptedFetcher {
    answers: Vec<(String, RatingBundle)>,
    delay: Duration,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<(String, String)>>,
}

impl ScriptedFetcher {
    pub fn new(answers: Vec<(&str, RatingBundle)>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|(id, b)| (id.to_string(), b))
                .collect(),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl RatingFetcher for ScriptedFetcher {
    async fn fetch_ratings(
        &self,
        catalog_id: &str,
        media_type: &MediaType,
    ) -> Option<RatingBundle> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((catalog_id.to_string(), media_type.to_string()));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answers
            .iter()
            .find(|(id, _)| id == catalog_id)
            .and_then(|(_, b)| b.non_empty())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
