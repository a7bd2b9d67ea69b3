// src/identity.rs
//! Card identity: which remote item a card requests, and the key we dedup on.

use std::fmt;

use crate::dom::{Document, NodeId};
use crate::page;

/// Sentinel used when a card has no enclosing section or no index.
pub const UNKNOWN: &str = "unknown";

/// What the card's request control points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub catalog_id: String,
    pub media_type: String,
}

/// `{section classes}-{media type}-{index}`.
///
/// Two cards with the same key are the same enrichment target, even when the
/// host re-rendered a different item into that slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new(section: &str, media_type: &str, index: &str) -> Self {
        Self(format!("{section}-{media_type}-{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read catalog id + media type off the card's request control.
/// `None` when the control or either attribute is missing (or blank).
pub fn extract_target(doc: &dyn Document, card: NodeId) -> Option<RequestTarget> {
    let button = doc.query_within(card, &page::REQUEST_BUTTON)?;
    let catalog_id = non_blank(doc.attribute(button, page::ATTR_CATALOG_ID))?;
    let media_type = non_blank(doc.attribute(button, page::ATTR_MEDIA_TYPE))?;
    Some(RequestTarget {
        catalog_id,
        media_type,
    })
}

/// Resolve a card to its target and identity key.
pub fn resolve(doc: &dyn Document, card: NodeId) -> Option<(IdentityKey, RequestTarget)> {
    let target = extract_target(doc, card)?;
    let section = doc
        .closest(card, &page::SECTION)
        .and_then(|s| doc.attribute(s, "class"))
        .unwrap_or_else(|| UNKNOWN.to_string());
    let index =
        non_blank(doc.attribute(card, page::ATTR_INDEX)).unwrap_or_else(|| UNKNOWN.to_string());
    let key = IdentityKey::new(&section, &target.media_type, &index);
    Some((key, target))
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}
