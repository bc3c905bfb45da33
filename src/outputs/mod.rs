//! Output generation for JSON artifacts and the Markdown run summary.
//!
//! # Submodules
//!
//! - [`json`]: Writes record sets and the analytics report as JSON files
//! - [`summary`]: Renders a Markdown summary of a run for humans
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── all_articles.json          # Every assembled record
//! ├── city_pulse_articles.json   # Records relevant for the city pulse feed
//! ├── city_pulse_analytics.json  # AnalyticsReport over all records
//! └── city_pulse_summary.md      # Human-readable run summary
//! ```

pub mod json;
pub mod summary;

pub const ALL_ARTICLES_FILE: &str = "all_articles.json";
pub const CITY_PULSE_ARTICLES_FILE: &str = "city_pulse_articles.json";
pub const ANALYTICS_FILE: &str = "city_pulse_analytics.json";
pub const SUMMARY_FILE: &str = "city_pulse_summary.md";
