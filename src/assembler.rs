//! Composes extracted fields, classification and urgency into a [`Record`].

use crate::classifier::ContentClassifier;
use crate::config::Lexicon;
use crate::models::{RawFields, Record, Sentiment};
use crate::scorer::UrgencyScorer;
use crate::sentiment::{LexiconSentiment, SentimentAnalyzer};
use crate::utils::{reading_time, word_count};
use itertools::Itertools;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Hex characters kept from the URL digest.
pub const RECORD_ID_LEN: usize = 12;

/// Stable record identifier: truncated SHA-256 of the source URL.
///
/// Same URL, same id, across runs and machines.
pub fn record_id(source_url: &str) -> String {
    let digest = Sha256::digest(source_url.as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(RECORD_ID_LEN);
    id
}

/// Builds records for one source site.
#[derive(Debug, Clone)]
pub struct RecordAssembler<A = LexiconSentiment> {
    classifier: ContentClassifier<A>,
    scorer: UrgencyScorer,
    source_name: String,
}

impl RecordAssembler<LexiconSentiment> {
    pub fn new(lexicon: Arc<Lexicon>, source_name: impl Into<String>) -> Self {
        Self::with_classifier(ContentClassifier::new(lexicon), source_name)
    }
}

impl<A: SentimentAnalyzer> RecordAssembler<A> {
    pub fn with_classifier(classifier: ContentClassifier<A>, source_name: impl Into<String>) -> Self {
        let scorer = UrgencyScorer::new(classifier.shared_lexicon());
        Self {
            classifier,
            scorer,
            source_name: source_name.into(),
        }
    }

    /// Assemble a record, or `None` when the page yielded no title.
    pub fn assemble(&self, raw: RawFields, source_url: &str) -> Option<Record> {
        let title = raw.title.trim().to_string();
        if title.is_empty() {
            return None;
        }
        let description = raw.description;

        let full_text = format!("{} {}", title, description);
        let classification = self
            .classifier
            .classify(&title, &description, source_url, &full_text);
        let urgency_score = self.scorer.score(
            &classification.categories,
            classification.sentiment,
            &title,
            &description,
        );

        let lexicon = self.classifier.lexicon();
        let relevant_for_city_pulse = classification
            .categories
            .iter()
            .any(|category| lexicon.is_actionable(category));

        let location = if raw.location.is_empty() {
            classification
                .locations_mentioned
                .first()
                .cloned()
                .unwrap_or_default()
        } else {
            raw.location
        };

        let tags = classification
            .categories
            .iter()
            .cloned()
            .chain(
                classification
                    .locations_mentioned
                    .iter()
                    .map(|place| place.to_lowercase()),
            )
            .chain(
                (classification.sentiment != Sentiment::Neutral)
                    .then(|| classification.sentiment.to_string()),
            )
            .unique()
            .collect();

        let words = word_count(&description);

        Some(Record {
            id: record_id(source_url),
            title,
            description,
            image_url: raw.image_url,
            video_url: raw.video_url,
            location,
            locations_mentioned: classification.locations_mentioned,
            timestamp: raw.timestamp,
            kind: classification.categories[0].clone(),
            categories: classification.categories,
            sentiment: classification.sentiment,
            urgency_score,
            source: self.source_name.clone(),
            source_url: source_url.to_string(),
            relevant_for_city_pulse,
            tags,
            word_count: words,
            reading_time: reading_time(words),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assembler() -> RecordAssembler {
        RecordAssembler::new(Arc::new(Lexicon::default()), "Times of India")
    }

    fn raw(title: &str, description: &str) -> RawFields {
        RawFields {
            title: title.to_string(),
            description: description.to_string(),
            timestamp: "2025-07-19 08:30:00".to_string(),
            ..RawFields::default()
        }
    }

    const URL: &str = "https://timesofindia.indiatimes.com/city/mumbai/articleshow/1.cms";

    #[test]
    fn test_record_id_is_stable_and_fixed_length() {
        let a = record_id(URL);
        assert_eq!(a, record_id(URL));
        assert_eq!(a.len(), RECORD_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, record_id("https://timesofindia.indiatimes.com/other"));
    }

    #[test]
    fn test_same_url_same_id_across_assemblies() {
        let first = assembler().assemble(raw("Rain in Pune", ""), URL).unwrap();
        let second = assembler().assemble(raw("Different title", "x"), URL).unwrap();
        assert_eq!(first.id, second.id);
    }

    #[test]
    fn test_missing_title_discards_record() {
        assert!(assembler().assemble(raw("", "Body text"), URL).is_none());
        assert!(assembler().assemble(raw("   ", "Body text"), URL).is_none());
    }

    #[test]
    fn test_emergency_scenario() {
        let record = assembler()
            .assemble(
                raw("Major fire emergency in Mumbai", "urgent evacuation underway"),
                "https://example.com/news/1",
            )
            .unwrap();
        assert!(record.categories.contains(&"emergency".to_string()));
        assert_ne!(record.sentiment, Sentiment::Positive);
        assert_eq!(record.urgency_score, 10);
        assert!(record.relevant_for_city_pulse);
        assert_eq!(record.location, "Mumbai");
        assert_eq!(record.kind, record.categories[0]);
    }

    #[test]
    fn test_declared_location_wins_over_mentions() {
        let mut fields = raw("Heavy rain lashes Chennai", "");
        fields.location = "Tambaram".to_string();
        let record = assembler().assemble(fields, URL).unwrap();
        assert_eq!(record.location, "Tambaram");
        assert_eq!(record.locations_mentioned, vec!["Chennai"]);
    }

    #[test]
    fn test_tags_union_in_stable_order() {
        let record = assembler()
            .assemble(
                raw("Terrible traffic jam in Delhi", "Commuters stranded in Delhi"),
                "https://example.com/news/1",
            )
            .unwrap();
        assert_eq!(record.categories, vec!["traffic"]);
        assert_eq!(record.sentiment, Sentiment::Negative);
        assert_eq!(record.tags, vec!["traffic", "delhi", "negative"]);
    }

    #[test]
    fn test_neutral_sentiment_not_tagged() {
        let record = assembler()
            .assemble(raw("School timings revised", ""), "https://example.com/news/1")
            .unwrap();
        assert_eq!(record.sentiment, Sentiment::Neutral);
        assert_eq!(record.tags, vec!["education"]);
        assert!(!record.relevant_for_city_pulse);
    }

    #[test]
    fn test_word_count_and_reading_time() {
        let empty = assembler().assemble(raw("Title", ""), URL).unwrap();
        assert_eq!((empty.word_count, empty.reading_time), (0, 0));

        let short = assembler().assemble(raw("Title", "a few words here"), URL).unwrap();
        assert_eq!((short.word_count, short.reading_time), (4, 1));

        let long_text = vec!["word"; 450].join(" ");
        let long = assembler().assemble(raw("Title", &long_text), URL).unwrap();
        assert_eq!((long.word_count, long.reading_time), (450, 2));
    }

    #[test]
    fn test_source_fields() {
        let record = assembler().assemble(raw("Title", ""), URL).unwrap();
        assert_eq!(record.source, "Times of India");
        assert_eq!(record.source_url, URL);
        assert_eq!(record.categories, vec!["city"]);
    }
}
