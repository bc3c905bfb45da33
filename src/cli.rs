//! Command-line interface definitions for City Pulse.
//!
//! All arguments can be provided via command-line flags or environment variables.

use clap::Parser;

/// Command-line arguments for the City Pulse scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape 200 articles into ./data
/// city_pulse -o ./data
///
/// # Smaller run with a custom lexicon
/// city_pulse -o ./data -n 50 -c ./city_pulse.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the JSON artifacts and summary
    #[arg(short, long, env = "CITY_PULSE_OUTPUT_DIR", default_value = ".")]
    pub output_dir: String,

    /// Number of article links to collect and process
    #[arg(short, long, env = "CITY_PULSE_NUM_ARTICLES", default_value_t = 200)]
    pub num_articles: usize,

    /// Optional path to a YAML file overriding the lexicon or site profile
    #[arg(short, long, env = "CITY_PULSE_CONFIG")]
    pub config: Option<String>,

    /// Override the site base URL from the configuration
    #[arg(long, env = "CITY_PULSE_BASE_URL")]
    pub base_url: Option<String>,

    /// Pages fetched and processed concurrently
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Pause before each request, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Retries per URL after the first failed attempt
    #[arg(long, default_value_t = 2)]
    pub max_retries: usize,
}
