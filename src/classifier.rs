//! Keyword categorization, sentiment labelling and gazetteer location matching.

use crate::config::Lexicon;
use crate::models::Sentiment;
use crate::sentiment::{LexiconSentiment, SentimentAnalyzer};
use std::sync::Arc;
use tracing::debug;

/// Category assigned when neither keywords nor URL hints match.
pub const GENERAL_CATEGORY: &str = "general";

/// Output of [`ContentClassifier::classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Never empty; lexicon order, then the URL-derived category.
    pub categories: Vec<String>,
    pub sentiment: Sentiment,
    /// Gazetteer order, no duplicates.
    pub locations_mentioned: Vec<String>,
}

/// Classifies article text against a [`Lexicon`].
#[derive(Debug, Clone)]
pub struct ContentClassifier<A = LexiconSentiment> {
    lexicon: Arc<Lexicon>,
    analyzer: A,
}

impl ContentClassifier<LexiconSentiment> {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self::with_analyzer(lexicon, LexiconSentiment)
    }
}

impl<A: SentimentAnalyzer> ContentClassifier<A> {
    pub fn with_analyzer(lexicon: Arc<Lexicon>, analyzer: A) -> Self {
        Self { lexicon, analyzer }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn shared_lexicon(&self) -> Arc<Lexicon> {
        Arc::clone(&self.lexicon)
    }

    /// Categorize, label sentiment and find mentioned places.
    ///
    /// Categories come from `title` + `description` and the URL; sentiment
    /// and locations are computed over `full_text`.
    pub fn classify(
        &self,
        title: &str,
        description: &str,
        source_url: &str,
        full_text: &str,
    ) -> Classification {
        Classification {
            categories: self.categorize(title, description, source_url),
            sentiment: self.sentiment(full_text),
            locations_mentioned: self.locations(full_text),
        }
    }

    /// Lexicon categories whose keywords appear in `title` or `description`,
    /// in lexicon order, plus the category of the first URL hint matching
    /// `source_url`. Falls back to `["general"]`.
    pub fn categorize(&self, title: &str, description: &str, source_url: &str) -> Vec<String> {
        let text = format!("{} {}", title, description).to_lowercase();

        let mut categories: Vec<String> = self
            .lexicon
            .categories
            .iter()
            .filter(|entry| entry.keywords.iter().any(|k| text.contains(k.as_str())))
            .map(|entry| entry.category.clone())
            .collect();

        // only the first structural hint counts
        if let Some(hint) = self
            .lexicon
            .url_hints
            .iter()
            .find(|hint| source_url.contains(hint.pattern.as_str()))
        {
            if !categories.contains(&hint.category) {
                categories.push(hint.category.clone());
            }
        }

        if categories.is_empty() {
            categories.push(GENERAL_CATEGORY.to_string());
        }
        categories
    }

    /// Sentiment label; analyzer failures resolve to neutral.
    pub fn sentiment(&self, text: &str) -> Sentiment {
        match self.analyzer.polarity(text) {
            Ok(polarity) => Sentiment::from_polarity(polarity, self.lexicon.sentiment_threshold),
            Err(e) => {
                debug!(error = %e, "Sentiment analysis failed; treating as neutral");
                Sentiment::Neutral
            }
        }
    }

    /// Gazetteer places mentioned in `text`, case-insensitively, in
    /// gazetteer order and without duplicates.
    pub fn locations(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let mut found: Vec<String> = Vec::new();
        for place in &self.lexicon.gazetteer {
            if lowered.contains(&place.to_lowercase()) && !found.contains(place) {
                found.push(place.clone());
            }
        }
        found
    }
}
