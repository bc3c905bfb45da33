//! # City Pulse
//!
//! Scrapes news-site articles and classifies them for a "city pulse"
//! monitoring feed: what happened, where, how it reads, and how urgent it is.
//!
//! ## Architecture
//!
//! The crate follows a pipeline architecture:
//! 1. **Discovery** ([`discovery`]): Pool article URLs from the site's section pages
//! 2. **Fetching** ([`fetch`]): Download pages politely, retrying transient failures
//! 3. **Extraction** ([`extractor`]): Pull title, body, media, location and time
//!    out of each page through ordered selector fallbacks
//! 4. **Classification** ([`classifier`], [`sentiment`]): Categories, sentiment
//!    and mentioned places
//! 5. **Scoring and assembly** ([`scorer`], [`assembler`]): Urgency score, tags,
//!    relevance and a stable id per record
//! 6. **Analytics** ([`analytics`]): Distribution statistics over the batch
//! 7. **Output** ([`outputs`]): JSON artifacts and a Markdown summary
//!
//! All classification tables live in [`config::PulseConfig`] and can be
//! replaced from YAML without touching code.

pub mod analytics;
pub mod assembler;
pub mod classifier;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod scorer;
pub mod sentiment;
pub mod utils;

pub use analytics::aggregate;
pub use assembler::{RecordAssembler, record_id};
pub use config::{Lexicon, PulseConfig, SiteProfile};
pub use error::PulseError;
pub use models::{AnalyticsReport, RawFields, Record, Sentiment};
pub use pipeline::{CityPulsePipeline, ScrapeOutcome};
