//! # City Pulse
//!
//! Command-line entry point: discovers articles on the configured news site,
//! classifies them for city pulse monitoring, and writes JSON artifacts plus
//! a Markdown summary.
//!
//! ## Usage
//!
//! ```sh
//! city_pulse -o ./data -n 200
//! ```

use city_pulse::analytics::aggregate;
use city_pulse::config::PulseConfig;
use city_pulse::fetch::{HttpFetcher, RetryFetch};
use city_pulse::outputs::{
    ALL_ARTICLES_FILE, ANALYTICS_FILE, CITY_PULSE_ARTICLES_FILE, SUMMARY_FILE, json,
    summary::render_summary,
};
use city_pulse::pipeline::CityPulsePipeline;
use city_pulse::utils::ensure_writable_dir;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;

/// Base delay for the retry backoff.
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("city_pulse starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => PulseConfig::from_yaml_file(path)?,
        None => PulseConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.site.base_url = base_url.clone();
    }
    info!(source = %config.site.name, base_url = %config.site.base_url, "Using site profile");

    // Early check: ensure output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Scrape ----
    let fetcher = RetryFetch::new(
        HttpFetcher::new(
            Duration::from_secs(args.timeout_secs),
            Duration::from_millis(args.delay_ms),
        )?,
        args.max_retries,
        RETRY_BASE_DELAY,
    );
    let pipeline = CityPulsePipeline::new(config, fetcher)?.with_concurrency(args.concurrency);

    info!(target = args.num_articles, "Starting City Pulse data scraping");
    let outcome = pipeline.run(args.num_articles).await;
    let city_pulse_records = outcome.city_pulse_records();
    let report = aggregate(&outcome.records);

    // ---- Outputs ----
    let output_dir = Path::new(&args.output_dir);
    if let Err(e) = json::write_records(output_dir, ALL_ARTICLES_FILE, &outcome.records).await {
        error!(error = %e, "Failed to write all articles");
    }
    if let Err(e) =
        json::write_records(output_dir, CITY_PULSE_ARTICLES_FILE, &city_pulse_records).await
    {
        error!(error = %e, "Failed to write city pulse articles");
    }
    if let Err(e) = json::write_report(output_dir, ANALYTICS_FILE, &report).await {
        error!(error = %e, "Failed to write analytics report");
    }

    let md = render_summary(&outcome, &report);
    let summary_path = output_dir.join(SUMMARY_FILE);
    if let Err(e) = tokio::fs::write(&summary_path, &md).await {
        error!(path = %summary_path.display(), error = %e, "Failed writing summary");
    } else {
        info!(path = %summary_path.display(), "Wrote run summary");
    }
    println!("{md}");

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        links = outcome.links_found,
        records = outcome.records.len(),
        city_pulse = city_pulse_records.len(),
        "Execution complete"
    );

    Ok(())
}
