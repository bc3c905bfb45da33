//! Additive urgency heuristic.
//!
//! The score starts from the heaviest category weight, moves with sentiment,
//! gets a flat bonus for emergency wording, and is clamped to `0..=10`.
//! Same inputs always give the same score.

use crate::config::Lexicon;
use crate::models::Sentiment;
use std::sync::Arc;

pub const MAX_URGENCY: u8 = 10;

const NEGATIVE_ADJUSTMENT: i32 = 2;
const POSITIVE_ADJUSTMENT: i32 = -1;
const EMERGENCY_KEYWORD_BONUS: i32 = 3;

#[derive(Debug, Clone)]
pub struct UrgencyScorer {
    lexicon: Arc<Lexicon>,
}

impl UrgencyScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Urgency of an article on a `0..=10` scale.
    ///
    /// # Arguments
    ///
    /// * `categories` - Categories from the classifier; the heaviest weight is the base
    /// * `sentiment` - Negative adds 2, positive subtracts 1
    /// * `title`, `description` - Searched for emergency keywords (+3)
    pub fn score(
        &self,
        categories: &[String],
        sentiment: Sentiment,
        title: &str,
        description: &str,
    ) -> u8 {
        let base = categories
            .iter()
            .map(|category| self.lexicon.urgency_weight(category))
            .max()
            .unwrap_or(self.lexicon.default_urgency_weight);

        let mood = match sentiment {
            Sentiment::Negative => NEGATIVE_ADJUSTMENT,
            Sentiment::Positive => POSITIVE_ADJUSTMENT,
            Sentiment::Neutral => 0,
        };

        let text = format!("{} {}", title, description).to_lowercase();
        let bonus = if self
            .lexicon
            .emergency_keywords
            .iter()
            .any(|keyword| text.contains(keyword.as_str()))
        {
            EMERGENCY_KEYWORD_BONUS
        } else {
            0
        };

        base.saturating_add(mood)
            .saturating_add(bonus)
            .clamp(0, MAX_URGENCY as i32) as u8
    }
}
