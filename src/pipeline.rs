//! End-to-end scraping pipeline: discover links, fetch pages, build records.
//!
//! The pipeline follows a two-phase pattern:
//!
//! 1. **Discovery**: Walk the site's sections and pool article URLs until the
//!    target count is reached
//! 2. **Processing**: Fetch each URL and run extraction, classification and
//!    scoring, a bounded number of pages at a time
//!
//! Failed fetches and pages without a title are logged, counted and
//! skipped; they never abort the batch.

use crate::assembler::RecordAssembler;
use crate::config::{PulseConfig, SiteProfile};
use crate::discovery::{LinkDiscoverer, LinkPool};
use crate::error::PulseError;
use crate::extractor::FieldExtractor;
use crate::fetch::PageFetcher;
use crate::models::Record;
use crate::sentiment::{LexiconSentiment, SentimentAnalyzer};
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use scraper::Html;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Pages processed concurrently unless configured otherwise.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Log progress after every this many processed URLs.
const PROGRESS_EVERY: usize = 25;

/// Longest URL or title put in a log line.
const LOG_FIELD_CHARS: usize = 120;

/// What happened to a single URL.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Record(Box<Record>),
    /// Page fetched but no title could be extracted.
    NoTitle,
    /// Transport failure; no document was seen.
    FetchFailed,
}

/// Result of processing a batch of URLs.
///
/// `links_found == records.len() + fetch_failures + extraction_failures`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapeOutcome {
    pub links_found: usize,
    pub records: Vec<Record>,
    pub fetch_failures: usize,
    pub extraction_failures: usize,
}

impl ScrapeOutcome {
    /// Records flagged as relevant for the city pulse feed.
    pub fn city_pulse_records(&self) -> Vec<Record> {
        self.records
            .iter()
            .filter(|record| record.relevant_for_city_pulse)
            .cloned()
            .collect()
    }

    fn push(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Record(record) => self.records.push(*record),
            PageOutcome::NoTitle => self.extraction_failures += 1,
            PageOutcome::FetchFailed => self.fetch_failures += 1,
        }
    }
}

/// Discovery, extraction and assembly wired to one site and one fetcher.
pub struct CityPulsePipeline<F, A = LexiconSentiment> {
    fetcher: F,
    profile: SiteProfile,
    base_url: Url,
    discoverer: LinkDiscoverer,
    extractor: FieldExtractor,
    assembler: RecordAssembler<A>,
    concurrency: usize,
}

impl<F: PageFetcher> CityPulsePipeline<F, LexiconSentiment> {
    /// Build a pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Fails if the site base URL or any selector in the profile is invalid.
    pub fn new(config: PulseConfig, fetcher: F) -> Result<Self, PulseError> {
        let assembler = RecordAssembler::new(Arc::new(config.lexicon), config.site.name.clone());
        Self::with_assembler(config.site, assembler, fetcher)
    }
}

impl<F: PageFetcher, A: SentimentAnalyzer> CityPulsePipeline<F, A> {
    pub fn with_assembler(
        profile: SiteProfile,
        assembler: RecordAssembler<A>,
        fetcher: F,
    ) -> Result<Self, PulseError> {
        Ok(Self {
            base_url: Url::parse(&profile.base_url)?,
            discoverer: LinkDiscoverer::from_profile(&profile)?,
            extractor: FieldExtractor::from_profile(&profile)?,
            fetcher,
            profile,
            assembler,
            concurrency: DEFAULT_CONCURRENCY,
        })
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Collect up to `target` unique article URLs across the site's sections.
    ///
    /// Sections are visited in profile order and discovery stops as soon as
    /// the target is reached. A section that fails to load is skipped.
    #[instrument(level = "info", skip(self))]
    pub async fn discover_links(&self, target: usize) -> Vec<String> {
        let mut pool = LinkPool::default();

        for section_url in self.profile.section_urls() {
            if pool.is_full(target) {
                break;
            }
            info!(section = %section_url, "Scraping section");

            let html = match self.fetcher.fetch(&section_url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(section = %section_url, error = %e, "Section fetch failed; skipping");
                    continue;
                }
            };

            let links = {
                let document = Html::parse_document(&html);
                self.discoverer.discover(&document, &self.base_url)
            };
            let found = links.len();
            let added = pool.extend_until(links, target);
            debug!(section = %section_url, found, added, total = pool.len(), "Section indexed");
        }

        info!(count = pool.len(), target, "Discovered article links");
        pool.into_links()
    }

    /// Turn one fetched page into a record, or `None` if it has no title.
    pub fn process_page(&self, html: &str, url: &str) -> Option<Record> {
        let page_url = Url::parse(url).unwrap_or_else(|_| self.base_url.clone());
        let raw = {
            let document = Html::parse_document(html);
            self.extractor.extract(&document, &page_url)
        };
        self.assembler.assemble(raw, url)
    }

    async fn process_url(&self, index: usize, url: &str) -> PageOutcome {
        let log_url = truncate_for_log(url, LOG_FIELD_CHARS);
        match self.fetcher.fetch(url).await {
            Ok(html) => match self.process_page(&html, url) {
                Some(record) => {
                    debug!(
                        index,
                        url = %log_url,
                        id = %record.id,
                        title = %truncate_for_log(&record.title, LOG_FIELD_CHARS),
                        urgency = record.urgency_score,
                        "Assembled record"
                    );
                    PageOutcome::Record(Box::new(record))
                }
                None => {
                    warn!(index, url = %log_url, "No title extracted; skipping page");
                    PageOutcome::NoTitle
                }
            },
            Err(e) => {
                warn!(index, url = %log_url, error = %e, "Article fetch failed; skipping");
                PageOutcome::FetchFailed
            }
        }
    }

    /// Fetch and process every URL, preserving link order in the output.
    #[instrument(level = "info", skip_all, fields(links = links.len()))]
    pub async fn process(&self, links: &[String]) -> ScrapeOutcome {
        let total = links.len();
        let outcomes: Vec<PageOutcome> = stream::iter(links.iter().enumerate())
            .map(|(i, url)| self.process_url(i, url))
            .buffered(self.concurrency)
            .enumerate()
            .inspect(|(done, _)| {
                if (done + 1) % PROGRESS_EVERY == 0 {
                    info!(processed = done + 1, total, "Progress");
                }
            })
            .map(|(_, outcome)| outcome)
            .collect()
            .await;

        let mut result = ScrapeOutcome {
            links_found: total,
            ..ScrapeOutcome::default()
        };
        for outcome in outcomes {
            result.push(outcome);
        }

        info!(
            total,
            records = result.records.len(),
            city_pulse = result.records.iter().filter(|r| r.relevant_for_city_pulse).count(),
            fetch_failures = result.fetch_failures,
            extraction_failures = result.extraction_failures,
            "Completed article processing"
        );
        result
    }

    /// Discover up to `target` links and process them.
    pub async fn run(&self, target: usize) -> ScrapeOutcome {
        let links = self.discover_links(target).await;
        self.process(&links).await
    }
}
