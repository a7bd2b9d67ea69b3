// src/page.rs
//! Host page contract: the markers the discover view renders and the ones we add.

use crate::dom::Matcher;

/// One rendered discover card.
pub const CARD: Matcher = Matcher::class("discover-card");
/// Request control inside a card; carries the catalog id and media type.
pub const REQUEST_BUTTON: Matcher = Matcher::class("discover-requestbutton")
    .with_tag("button")
    .with_attr(ATTR_CATALOG_ID);
/// Scalable poster container; the overlay is attached here.
pub const SCALABLE: Matcher = Matcher::class("cardScalable");
/// Horizontal row of cards; its class list disambiguates reused indices.
pub const SECTION: Matcher = Matcher::class("verticalSection");
/// Our overlay.
pub const OVERLAY: Matcher = Matcher::class(OVERLAY_CLASS);

pub const ATTR_INDEX: &str = "data-index";
pub const ATTR_CATALOG_ID: &str = "data-id";
pub const ATTR_MEDIA_TYPE: &str = "data-media-type";
pub const ATTR_PROCESSED: &str = "data-rating-processed";

pub const OVERLAY_CLASS: &str = "rating-badges-container";
pub const BADGE_CLASS: &str = "rating-badge";
pub const STYLE_ID: &str = "rating-badges-style";
