//! Markdown summary of a scraping run.

use crate::models::AnalyticsReport;
use crate::pipeline::ScrapeOutcome;
use crate::utils::truncate_chars;

const TOP_N: usize = 5;
const HIGH_URGENCY_SHOWN: usize = 3;
const TITLE_PREVIEW_CHARS: usize = 60;

/// Render the run summary: totals, top categories and locations, sentiment
/// split and the most urgent headlines.
pub fn render_summary(outcome: &ScrapeOutcome, report: &AnalyticsReport) -> String {
    let mut md = String::new();

    md.push_str("# City Pulse Data Collection Summary\n\n");
    md.push_str(&format!("- Links discovered: {}\n", outcome.links_found));
    md.push_str(&format!("- Total articles scraped: {}\n", report.total_articles));
    md.push_str(&format!(
        "- City Pulse relevant articles: {}\n",
        report.city_pulse_relevant
    ));
    md.push_str(&format!(
        "- Skipped: {} fetch failures, {} without title\n",
        outcome.fetch_failures, outcome.extraction_failures
    ));
    md.push_str(&format!(
        "- Average urgency score: {:.2}\n",
        report.average_urgency_score
    ));
    md.push_str(&format!(
        "- High urgency articles (7+): {}\n",
        report.high_urgency_articles.len()
    ));

    md.push_str("\n## Top Categories\n\n");
    for (category, count) in report.top_categories(TOP_N) {
        md.push_str(&format!("- {}: {} articles\n", category, count));
    }

    md.push_str("\n## Top Locations\n\n");
    for (location, count) in report.top_location_counts(TOP_N) {
        md.push_str(&format!("- {}: {} mentions\n", location, count));
    }

    md.push_str("\n## Sentiment Distribution\n\n");
    for (sentiment, count) in &report.sentiment_distribution {
        md.push_str(&format!("- {}: {} articles\n", sentiment, count));
    }

    md.push_str("\n## High Urgency Articles\n\n");
    for article in report.high_urgency_articles.iter().take(HIGH_URGENCY_SHOWN) {
        let preview = truncate_chars(&article.title, TITLE_PREVIEW_CHARS);
        let ellipsis = if preview.len() < article.title.len() { "..." } else { "" };
        md.push_str(&format!(
            "- {}{} (Score: {})\n",
            preview, ellipsis, article.urgency_score
        ));
    }

    md
}
