//! Data models for scraped pages, classified records and batch analytics.
//!
//! This module defines the core data structures used throughout the crate:
//! - [`RawFields`]: Structural fields pulled out of a page before classification
//! - [`Record`]: One normalized, classified article (the output schema)
//! - [`Sentiment`]: Polarity label attached to every record
//! - [`AnalyticsReport`]: Aggregate statistics over a batch of records
//!
//! Field names of [`Record`] and [`AnalyticsReport`] are the JSON contract
//! consumed downstream and must not be renamed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Fields extracted from a page by the selector chains.
///
/// Every field is empty when no selector matched, except `timestamp`, which
/// falls back to the extraction time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub video_url: String,
    /// Location declared by the page itself (dateline, place tag).
    pub location: String,
    pub timestamp: String,
}

/// Coarse polarity of an article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    /// Lowercase label used in JSON, tags and analytics keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        }
    }

    /// Map a polarity in [-1, 1] to a label using a symmetric threshold.
    pub fn from_polarity(polarity: f64, threshold: f64) -> Self {
        if polarity > threshold {
            Sentiment::Positive
        } else if polarity < -threshold {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized, classified article.
///
/// Created once per fetched page that has a title and never mutated
/// afterwards. `id` is derived from `source_url` alone, so consumers can
/// deduplicate across batches.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Record {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(alias = "img_url")]
    pub image_url: String,
    pub video_url: String,
    pub location: String,
    pub locations_mentioned: Vec<String>,
    pub timestamp: String,
    /// First category, used as a coarse discriminant.
    #[serde(rename = "type")]
    pub kind: String,
    pub categories: Vec<String>,
    pub sentiment: Sentiment,
    pub urgency_score: u8,
    pub source: String,
    pub source_url: String,
    pub relevant_for_city_pulse: bool,
    pub tags: Vec<String>,
    pub word_count: usize,
    /// Minutes at 200 words per minute.
    pub reading_time: usize,
}

/// A high-urgency record reduced to what an alerting view needs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HighUrgencyArticle {
    pub title: String,
    pub urgency_score: u8,
    pub categories: Vec<String>,
    pub location: String,
}

/// Aggregate statistics over a batch of records.
///
/// Derived and read-only; always recomputed from scratch by
/// [`crate::analytics::aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnalyticsReport {
    pub total_articles: usize,
    pub city_pulse_relevant: usize,
    pub categories_distribution: BTreeMap<String, usize>,
    pub sentiment_distribution: BTreeMap<String, usize>,
    /// Keyed by even/odd score pairs, e.g. `"4-5"`.
    pub urgency_distribution: BTreeMap<String, usize>,
    pub top_locations: BTreeMap<String, usize>,
    pub average_urgency_score: f64,
    pub high_urgency_articles: Vec<HighUrgencyArticle>,
}

impl AnalyticsReport {
    /// The `n` most frequent categories, most frequent first.
    pub fn top_categories(&self, n: usize) -> Vec<(&str, usize)> {
        top_n(&self.categories_distribution, n)
    }

    /// The `n` most mentioned locations, most mentioned first.
    pub fn top_location_counts(&self, n: usize) -> Vec<(&str, usize)> {
        top_n(&self.top_locations, n)
    }
}

fn top_n(counts: &BTreeMap<String, usize>, n: usize) -> Vec<(&str, usize)> {
    let mut pairs: Vec<(&str, usize)> = counts.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    // BTreeMap iteration is already name-ordered, so a stable sort keeps ties alphabetical
    pairs.sort_by(|a, b| b.1.cmp(&a.1));
    pairs.truncate(n);
    pairs
}
