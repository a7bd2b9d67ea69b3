// src/ratings/mod.rs
pub mod seerr;

pub use seerr::SeerrClient;

use std::fmt;
use std::sync::Arc;

/// Where a score comes from. Order of the variants is the presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RatingSource {
    /// Primary metadata score, 0–10.
    Aggregator,
    /// Secondary critic consensus, 0–10.
    CriticAggregate,
    /// Secondary audience consensus, 0–100 percent.
    AudienceAggregate,
}

impl RatingSource {
    pub const ALL: [RatingSource; 3] = [
        RatingSource::Aggregator,
        RatingSource::CriticAggregate,
        RatingSource::AudienceAggregate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RatingSource::Aggregator => "AGG",
            RatingSource::CriticAggregate => "CRITIC",
            RatingSource::AudienceAggregate => "AUD",
        }
    }

    /// CSS modifier class on the badge.
    pub fn css_class(self) -> &'static str {
        match self {
            RatingSource::Aggregator => "agg",
            RatingSource::CriticAggregate => "critic",
            RatingSource::AudienceAggregate => "aud",
        }
    }

    pub fn is_percentage(self) -> bool {
        matches!(self, RatingSource::AudienceAggregate)
    }
}

/// Media type as carried by the card's request control.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaType {
    Movie,
    Tv,
    Other(String),
}

impl MediaType {
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "movie" => MediaType::Movie,
            "tv" => MediaType::Tv,
            other => MediaType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scores that came back, each in its native scale.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingBundle {
    pub aggregator: Option<f64>,
    pub critic_aggregate: Option<f64>,
    pub audience_aggregate: Option<f64>,
}

impl RatingBundle {
    pub fn get(&self, source: RatingSource) -> Option<f64> {
        match source {
            RatingSource::Aggregator => self.aggregator,
            RatingSource::CriticAggregate => self.critic_aggregate,
            RatingSource::AudienceAggregate => self.audience_aggregate,
        }
    }

    pub fn set(&mut self, source: RatingSource, value: f64) {
        let slot = match source {
            RatingSource::Aggregator => &mut self.aggregator,
            RatingSource::CriticAggregate => &mut self.critic_aggregate,
            RatingSource::AudienceAggregate => &mut self.audience_aggregate,
        };
        *slot = Some(value);
    }

    /// Populated fields in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = (RatingSource, f64)> + '_ {
        RatingSource::ALL
            .into_iter()
            .filter_map(move |s| self.get(s).map(|v| (s, v)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` for an empty bundle: "no ratings" never reaches the renderer.
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

/// Retrieves a rating bundle for one catalog item.
///
/// Implementations recover from every failure themselves; `None` means
/// "nothing to show".
#[async_trait::async_trait]
pub trait RatingFetcher: Send + Sync {
    async fn fetch_ratings(&self, catalog_id: &str, media_type: &MediaType)
        -> Option<RatingBundle>;

    /// Name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynFetcher = Arc<dyn RatingFetcher>;
