// src/render.rs
//! Badge overlay: one small labelled score per populated source, stacked in
//! the bottom-left corner of the card poster.

use crate::dom::{Document, Fragment, NodeId};
use crate::page;
use crate::ratings::{RatingBundle, RatingSource};

/// Global presentation rules, injected once per document.
pub const STYLESHEET: &str = r#"
.rating-badges-container {
    position: absolute !important;
    bottom: 8px !important;
    left: 8px !important;
    display: flex !important;
    flex-direction: column !important;
    gap: 4px !important;
    z-index: 99999 !important;
    pointer-events: none !important;
}
.rating-badge {
    background: rgba(0, 0, 0, 0.85) !important;
    padding: 3px 6px !important;
    border-radius: 3px !important;
    font-weight: bold !important;
    font-size: 11px !important;
    display: flex !important;
    align-items: center !important;
    gap: 3px !important;
    box-shadow: 0 2px 4px rgba(0, 0, 0, 0.5) !important;
    white-space: nowrap !important;
}
.rating-badge.agg {
    color: #01d277 !important;
}
.rating-badge.critic {
    color: #f5c518 !important;
}
.rating-badge.aud {
    color: #fa320a !important;
}
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Card has no scalable container; nothing touched.
    NoTarget,
    /// Nothing to show; any previous overlay was removed.
    Empty,
    /// Overlay attached with this many badges.
    Rendered(usize),
}

/// Short score text in the source's native scale.
pub fn format_score(source: RatingSource, value: f64) -> String {
    if source.is_percentage() {
        format!("{value:.0}%")
    } else {
        format!("{value:.1}")
    }
}

/// Visible badge text, e.g. `AGG 7.9` or `AUD 89%`.
pub fn badge_text(source: RatingSource, value: f64) -> String {
    format!("{} {}", source.label(), format_score(source, value))
}

pub fn badge_tooltip(source: RatingSource, value: f64) -> String {
    if source.is_percentage() {
        format!("{} Score: {}", source.label(), format_score(source, value))
    } else {
        format!("{} Rating: {}/10", source.label(), format_score(source, value))
    }
}

/// Build the detached overlay subtree for `bundle`.
pub fn build_overlay(bundle: &RatingBundle) -> Fragment {
    bundle.iter().fold(
        Fragment::element("div").class(page::OVERLAY_CLASS),
        |overlay, (source, value)| {
            overlay.child(
                Fragment::element("div")
                    .class(format!("{} {}", page::BADGE_CLASS, source.css_class()))
                    .attr("title", badge_tooltip(source, value))
                    .text(badge_text(source, value)),
            )
        },
    )
}

/// Replace the card's overlay with one built from `bundle`.
pub fn render(doc: &dyn Document, card: NodeId, bundle: &RatingBundle) -> RenderOutcome {
    let Some(target) = doc.query_within(card, &page::SCALABLE) else {
        return RenderOutcome::NoTarget;
    };

    if let Some(existing) = doc.query_within(target, &page::OVERLAY) {
        doc.remove(existing);
    }

    let overlay = build_overlay(bundle);
    if !overlay.has_children() {
        return RenderOutcome::Empty;
    }
    let count = overlay.children.len();

    doc.set_style(target, "position", "relative");
    doc.set_style(target, "overflow", "visible");
    doc.append_fragment(target, overlay);
    RenderOutcome::Rendered(count)
}

/// Inject [`STYLESHEET`] unless already present.
pub fn install_styles(doc: &dyn Document) -> bool {
    doc.inject_style(page::STYLE_ID, STYLESHEET)
}
