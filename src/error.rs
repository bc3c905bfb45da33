//! Error types for the city pulse pipeline.
//!
//! Only configuration, transport and persistence surface errors. Extraction
//! misses are empty fields and analysis failures resolve to neutral sentiment,
//! so neither shows up here as a failure of the batch.

use thiserror::Error;

/// Errors that can occur while configuring, fetching, or writing output.
#[derive(Debug, Error)]
pub enum PulseError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected status {status} for {url}")]
    Status {
        /// The requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// A URL could not be parsed or resolved
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A CSS selector in the site profile failed to parse
    #[error("Invalid selector: {0}")]
    Selector(String),

    /// Sentiment estimation could not handle the input
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PulseError {
    /// Whether a retry has a chance of succeeding.
    ///
    /// Timeouts, connection failures, `429` and `5xx` answers are transient.
    /// Everything else (a `404`, a bad URL, a body that failed to decode) is
    /// returned to the caller without another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            PulseError::Http(e) => e.is_timeout() || e.is_connect(),
            PulseError::Status { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}
