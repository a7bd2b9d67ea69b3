// src/ratings/seerr.rs
//! Jellyseerr-compatible metadata service client.
//!
//! Two requests per item: base details (aggregator score), then a
//! media-type specific ratings endpoint. A non-2xx answer only blanks that
//! endpoint; a transport or decode failure abandons the whole lookup, and so
//! does every endpoint answering non-2xx.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::counter;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{MediaType, RatingBundle, RatingFetcher, RatingSource};
use crate::config::InjectorConfig;
use crate::telemetry;

/// Sent on every request; header names are case-insensitive on the wire.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
pub(crate) struct MediaDetails {
    #[serde(rename = "voteAverage", default)]
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreBlock {
    #[serde(rename = "criticsScore", default)]
    critics_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CombinedRatings {
    #[serde(default)]
    imdb: Option<ScoreBlock>,
    #[serde(default)]
    rt: Option<ScoreBlock>,
}

/// Absent, null, zero and non-finite all mean "no data".
fn score(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite() && *x != 0.0)
}

fn apply_details(bundle: &mut RatingBundle, d: &MediaDetails) {
    if let Some(v) = score(d.vote_average) {
        bundle.set(RatingSource::Aggregator, v);
    }
}

fn apply_combined(bundle: &mut RatingBundle, r: &CombinedRatings) {
    if let Some(v) = score(r.imdb.as_ref().and_then(|b| b.critics_score)) {
        bundle.set(RatingSource::CriticAggregate, v);
    }
    if let Some(v) = score(r.rt.as_ref().and_then(|b| b.critics_score)) {
        bundle.set(RatingSource::AudienceAggregate, v);
    }
}

fn apply_tv(bundle: &mut RatingBundle, r: &ScoreBlock) {
    if let Some(v) = score(r.critics_score) {
        bundle.set(RatingSource::CriticAggregate, v);
    }
}

/// A single non-empty path segment that is not a dot segment.
fn is_path_segment(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".."
}

#[derive(Clone)]
pub struct SeerrClient {
    base_url: String,
    client: Client,
}

impl SeerrClient {
    pub fn new(cfg: &InjectorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(API_KEY_HEADER),
            HeaderValue::from_str(&cfg.api_key).context("api key is not a valid header value")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context("building metadata http client")?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn details_url(&self, catalog_id: &str, media_type: &MediaType) -> String {
        format!(
            "{}/api/v1/{}/{}",
            self.base_url,
            urlencoding::encode(media_type.as_str()),
            urlencoding::encode(catalog_id)
        )
    }

    /// Secondary endpoint for the media type, if it has one.
    pub fn ratings_url(&self, catalog_id: &str, media_type: &MediaType) -> Option<String> {
        match media_type {
            MediaType::Movie => Some(format!(
                "{}/api/v1/movie/{}/ratingscombined",
                self.base_url,
                urlencoding::encode(catalog_id)
            )),
            MediaType::Tv => Some(format!(
                "{}/api/v1/tv/{}/ratings",
                self.base_url,
                urlencoding::encode(catalog_id)
            )),
            MediaType::Other(_) => None,
        }
    }

    /// `Ok(None)` for a non-2xx status; `Err` for transport/decode failures.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            tracing::debug!(target: "badges", %url, %status, "no data from endpoint");
            return Ok(None);
        }
        let body = resp
            .json::<T>()
            .await
            .with_context(|| format!("decoding {url}"))?;
        Ok(Some(body))
    }

    /// Both lookups, merged. Errors on transport/decode failure, or when no
    /// endpoint answered 2xx at all.
    pub async fn try_fetch(
        &self,
        catalog_id: &str,
        media_type: &MediaType,
    ) -> Result<RatingBundle> {
        let mut bundle = RatingBundle::default();
        let mut answered = 0usize;
        let mut asked = 1usize;

        let url = self.details_url(catalog_id, media_type);
        if let Some(d) = self.get_json::<MediaDetails>(&url).await? {
            answered += 1;
            apply_details(&mut bundle, &d);
        }

        if let Some(url) = self.ratings_url(catalog_id, media_type) {
            asked += 1;
            match media_type {
                MediaType::Movie => {
                    if let Some(r) = self.get_json::<CombinedRatings>(&url).await? {
                        answered += 1;
                        apply_combined(&mut bundle, &r);
                    }
                }
                MediaType::Tv => {
                    if let Some(r) = self.get_json::<ScoreBlock>(&url).await? {
                        answered += 1;
                        apply_tv(&mut bundle, &r);
                    }
                }
                MediaType::Other(_) => {}
            }
        }

        if answered == 0 {
            bail!("all {asked} endpoint(s) answered with a non-success status");
        }
        Ok(bundle)
    }
}

#[async_trait]
impl RatingFetcher for SeerrClient {
    async fn fetch_ratings(
        &self,
        catalog_id: &str,
        media_type: &MediaType,
    ) -> Option<RatingBundle> {
        if !is_path_segment(catalog_id) || !is_path_segment(media_type.as_str()) {
            tracing::warn!(
                target: "badges",
                catalog_id,
                media_type = %media_type,
                "malformed card identifiers; not querying"
            );
            return None;
        }
        match self.try_fetch(catalog_id, media_type).await {
            Ok(bundle) => bundle.non_empty(),
            Err(e) => {
                tracing::error!(
                    target: "badges",
                    error = ?e,
                    base_url = %self.base_url,
                    "metadata service request failed; it is likely unreachable or not allowing requests from this origin (CORS)"
                );
                telemetry::ensure_metrics_described();
                counter!(telemetry::FETCH_ERRORS_TOTAL).increment(1);
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        "seerr"
    }
}
