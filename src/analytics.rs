//! Batch analytics over assembled records.

use crate::models::{AnalyticsReport, HighUrgencyArticle, Record};

/// Records at or above this score are listed as high urgency.
pub const HIGH_URGENCY_THRESHOLD: u8 = 7;

/// Bucket label pairing an even score with the next odd one, e.g. `5 -> "4-5"`.
pub fn urgency_bucket(score: u8) -> String {
    let low = score / 2 * 2;
    format!("{}-{}", low, low + 1)
}

/// Compute the analytics report for a batch.
///
/// Pure and recomputed from scratch on every call. An empty batch yields a
/// zeroed report with `average_urgency_score == 0.0`.
pub fn aggregate(records: &[Record]) -> AnalyticsReport {
    let mut report = AnalyticsReport {
        total_articles: records.len(),
        ..AnalyticsReport::default()
    };
    let mut urgency_sum: u64 = 0;

    for record in records {
        if record.relevant_for_city_pulse {
            report.city_pulse_relevant += 1;
        }

        for category in &record.categories {
            *report
                .categories_distribution
                .entry(category.clone())
                .or_insert(0) += 1;
        }

        *report
            .sentiment_distribution
            .entry(record.sentiment.to_string())
            .or_insert(0) += 1;

        *report
            .urgency_distribution
            .entry(urgency_bucket(record.urgency_score))
            .or_insert(0) += 1;
        urgency_sum += u64::from(record.urgency_score);

        for location in &record.locations_mentioned {
            *report.top_locations.entry(location.clone()).or_insert(0) += 1;
        }

        if record.urgency_score >= HIGH_URGENCY_THRESHOLD {
            report.high_urgency_articles.push(HighUrgencyArticle {
                title: record.title.clone(),
                urgency_score: record.urgency_score,
                categories: record.categories.clone(),
                location: record.location.clone(),
            });
        }
    }

    if !records.is_empty() {
        report.average_urgency_score = urgency_sum as f64 / records.len() as f64;
    }
    report
}
