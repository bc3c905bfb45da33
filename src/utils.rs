//! Utility functions for text normalization, timestamps and file system checks.
//!
//! This module provides helper functions used throughout the crate:
//! - Whitespace collapsing and char-safe truncation of extracted text
//! - Word count and reading time derived from descriptions
//! - Timestamp formatting for the extraction-time fallback
//! - File system validation for output directories

use chrono::NaiveDateTime;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Format used for fallback timestamps, e.g. `2025-07-19 14:05:09`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Assumed reading speed for `reading_time`.
pub const WORDS_PER_MINUTE: usize = 200;

/// Join the whitespace-separated words of `text` with single spaces.
///
/// Text pulled out of nested elements tends to carry newlines and runs of
/// indentation; records store it flattened.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max` characters of `s`.
///
/// Counts chars rather than bytes so multi-byte text (Devanagari, emoji)
/// never gets split mid-codepoint.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Reading time in whole minutes.
///
/// Zero for empty text; otherwise at least one minute, even for articles
/// shorter than [`WORDS_PER_MINUTE`].
pub fn reading_time(words: usize) -> usize {
    if words == 0 {
        0
    } else {
        (words / WORDS_PER_MINUTE).max(1)
    }
}

/// Format a timestamp as [`TIMESTAMP_FORMAT`] (`2024-05-01 09:30:00`).
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Ensure a directory exists and is writable.
///
/// This function creates the directory if it doesn't exist, then performs
/// a write test by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
