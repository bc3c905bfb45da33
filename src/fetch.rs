//! Page fetching with politeness delay and exponential backoff.
//!
//! # Architecture
//!
//! - [`PageFetcher`]: Core trait, fetch a URL and return its body
//! - [`HttpFetcher`]: `reqwest` client with browser-like headers and a timeout
//! - [`RetryFetch`]: Decorator that adds retry logic to any `PageFetcher`
//!
//! # Retry Strategy
//!
//! - Exponential backoff starting at `base_delay`
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd
//! - Only transient errors (see [`PulseError::is_transient`]) are retried

use crate::error::PulseError;
use rand::{Rng, rng};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};
use tokio::sync::Mutex;
use tokio::time::{Instant as TokioInstant, sleep, sleep_until};
use tracing::{debug, error, instrument, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Trait for async page retrieval.
///
/// Implementors return the response body of a successful request. Anything
/// else (timeouts, non-2xx statuses) is an error the caller skips.
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> Result<String, PulseError>;
}

/// HTTP fetcher backed by a shared `reqwest::Client`.
///
/// Clones share the client and the pacing gate, so concurrent workers
/// together send at most one request per `delay`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    /// Minimum spacing between request starts.
    delay: StdDuration,
    last_request: Arc<Mutex<Option<TokioInstant>>>,
}

impl HttpFetcher {
    /// Build a client with browser-like headers and a per-request timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Limit for a whole request, body included
    /// * `delay` - Minimum spacing between any two requests from this fetcher
    ///   and its clones
    pub fn new(timeout: StdDuration, delay: StdDuration) -> Result<Self, PulseError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            delay,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Wait until `delay` has passed since the previous request started.
    ///
    /// The lock is held while sleeping, so waiting workers queue up and
    /// leave one `delay` apart.
    async fn pace(&self) {
        if self.delay.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            sleep_until(previous + self.delay).await;
        }
        *last = Some(TokioInstant::now());
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, PulseError> {
        self.pace().await;
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PulseError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`PageFetcher`].
///
/// The delay between retries follows this formula:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryFetch<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> RetryFetch<T>
where
    T: PageFetcher,
{
    /// Wrap `inner` with retries.
    ///
    /// # Arguments
    ///
    /// * `inner` - The fetcher to retry
    /// * `max_retries` - Extra attempts after the first one fails transiently
    /// * `base_delay` - Backoff before the first retry; doubles per attempt
    ///
    /// # Example
    ///
    /// ```ignore
    /// let fetcher = HttpFetcher::new(Duration::from_secs(10), Duration::from_millis(500))?;
    /// let retrying = RetryFetch::new(fetcher, 2, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1u32 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> PageFetcher for RetryFetch<T>
where
    T: PageFetcher,
{
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, PulseError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            match self.inner.fetch(url).await {
                Ok(body) => return Ok(body),
                Err(e) if !e.is_transient() => {
                    debug!(error = %e, "fetch() failed permanently; not retrying");
                    return Err(e);
                }
                Err(e) => {
                    attempt += 1;
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            elapsed_ms_total = total_dt.as_millis() as u64,
                            error = %e,
                            "fetch() exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "fetch() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails a fixed number of times with `status`, then succeeds.
    struct Flaky {
        failures: usize,
        status: u16,
        calls: AtomicUsize,
    }

    impl Flaky {
        fn new(failures: usize, status: u16) -> Self {
            Self {
                failures,
                status,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl PageFetcher for Flaky {
        async fn fetch(&self, url: &str) -> Result<String, PulseError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(PulseError::Status {
                    url: url.to_string(),
                    status: self.status,
                })
            } else {
                Ok("<html></html>".to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_retry_then_succeed() {
        let fetcher = RetryFetch::new(
            Flaky::new(2, 503),
            3,
            StdDuration::from_millis(10),
        );
        let body = fetcher.fetch("https://example.com").await.unwrap();
        assert_eq!(body, "<html></html>");
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_exhausted_returns_last_error() {
        let fetcher = RetryFetch::new(
            Flaky::new(usize::MAX, 503),
            2,
            StdDuration::from_millis(10),
        );
        let err = fetcher.fetch("https://example.com").await.unwrap_err();
        assert!(matches!(err, PulseError::Status { status: 503, .. }));
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let fetcher = RetryFetch::new(Flaky::new(usize::MAX, 404), 2, StdDuration::from_millis(10));
        let err = fetcher.fetch("https://example.com/gone").await.unwrap_err();
        assert!(matches!(err, PulseError::Status { status: 404, .. }));
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_is_retried() {
        let fetcher = RetryFetch::new(Flaky::new(1, 429), 2, StdDuration::from_millis(10));
        assert!(fetcher.fetch("https://example.com").await.is_ok());
        assert_eq!(fetcher.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_pacing_is_shared_across_clones() {
        let fetcher =
            HttpFetcher::new(StdDuration::from_secs(10), StdDuration::from_millis(40)).unwrap();
        let other = fetcher.clone();
        let t0 = Instant::now();
        futures::join!(fetcher.pace(), other.pace(), fetcher.pace(), other.pace());
        assert!(t0.elapsed() >= StdDuration::from_millis(120));
    }

    #[tokio::test]
    async fn test_zero_delay_does_not_wait() {
        let fetcher = HttpFetcher::new(StdDuration::from_secs(10), StdDuration::ZERO).unwrap();
        let t0 = Instant::now();
        futures::join!(fetcher.pace(), fetcher.pace());
        assert!(t0.elapsed() < StdDuration::from_millis(40));
    }

    #[test]
    fn test_backoff_is_capped() {
        let fetcher = RetryFetch::new(
            Flaky::new(0, 503),
            10,
            StdDuration::from_secs(1),
        );
        let first = fetcher.backoff(1);
        assert!(first >= StdDuration::from_secs(1));
        assert!(first <= StdDuration::from_millis(1250));
        let late = fetcher.backoff(12);
        assert!(late <= StdDuration::from_millis(30_250));
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new(StdDuration::from_secs(10), StdDuration::ZERO).is_ok());
    }
}
