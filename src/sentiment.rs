//! Polarity estimation for article text.
//!
//! [`SentimentAnalyzer`] is the seam the classifier calls through; it returns
//! a polarity in `[-1.0, 1.0]` or an error, and the classifier turns any error
//! into a neutral label. [`LexiconSentiment`] is the built-in analyzer: a
//! word-polarity table with simple negation and intensifier handling,
//! averaged over the opinion words found in the text.

use crate::error::PulseError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Estimates the polarity of a piece of text.
pub trait SentimentAnalyzer {
    /// Polarity in `[-1.0, 1.0]`; `0.0` means no opinion was detected.
    fn polarity(&self, text: &str) -> Result<f64, PulseError>;
}

static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("word pattern is valid")
});

/// Built-in polarity table. Values follow common opinion-lexicon scales.
static POLARITY: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        // positive
        ("good", 0.7),
        ("great", 0.8),
        ("excellent", 1.0),
        ("best", 1.0),
        ("better", 0.5),
        ("happy", 0.8),
        ("successful", 0.75),
        ("success", 0.3),
        ("safe", 0.5),
        ("beautiful", 0.85),
        ("wonderful", 1.0),
        ("amazing", 0.6),
        ("positive", 0.23),
        ("improved", 0.5),
        ("improve", 0.4),
        ("win", 0.8),
        ("wins", 0.8),
        ("won", 0.8),
        ("celebrate", 0.5),
        ("celebration", 0.5),
        ("relief", 0.4),
        ("clean", 0.37),
        ("free", 0.4),
        ("boost", 0.4),
        ("welcome", 0.8),
        ("smooth", 0.4),
        ("record", 0.1),
        ("award", 0.5),
        ("inaugurated", 0.3),
        ("restored", 0.4),
        // negative
        ("bad", -0.7),
        ("worse", -0.4),
        ("worst", -1.0),
        ("terrible", -1.0),
        ("horrible", -1.0),
        ("awful", -1.0),
        ("poor", -0.4),
        ("sad", -0.5),
        ("dead", -0.2),
        ("death", -0.4),
        ("deaths", -0.4),
        ("killed", -0.6),
        ("injured", -0.5),
        ("violent", -0.8),
        ("violence", -0.8),
        ("attack", -0.6),
        ("murder", -0.9),
        ("crisis", -0.5),
        ("disaster", -0.8),
        ("damage", -0.5),
        ("damaged", -0.5),
        ("shortage", -0.4),
        ("angry", -0.5),
        ("fear", -0.5),
        ("chaos", -0.6),
        ("collapse", -0.6),
        ("collapsed", -0.6),
        ("arrested", -0.3),
        ("fraud", -0.7),
        ("failed", -0.5),
        ("failure", -0.5),
        ("severe", -0.6),
        ("dangerous", -0.6),
        ("stranded", -0.4),
        ("delayed", -0.3),
    ]
    .into_iter()
    .collect()
});

static NEGATORS: &[&str] = &["not", "no", "never", "nor", "without"];

static INTENSIFIERS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("very", 1.3),
        ("extremely", 1.5),
        ("really", 1.2),
        ("highly", 1.3),
        ("so", 1.2),
        ("slightly", 0.6),
    ]
    .into_iter()
    .collect()
});

/// Word-polarity lexicon analyzer.
///
/// A negator directly before an opinion word (or a word ending in `n't`)
/// scales it by `-0.5`; an intensifier directly before scales it by its
/// factor. The result is the mean over opinion words, clamped to `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    fn is_negator(word: &str) -> bool {
        NEGATORS.iter().any(|negator| *negator == word) || word.ends_with("n't")
    }
}

impl SentimentAnalyzer for LexiconSentiment {
    fn polarity(&self, text: &str) -> Result<f64, PulseError> {
        let lowered = text.to_lowercase();
        let mut total = 0.0;
        let mut hits = 0usize;
        let mut negated = false;
        let mut factor = 1.0;

        for word in WORD.find_iter(&lowered).map(|m| m.as_str()) {
            if let Some(score) = POLARITY.get(word) {
                let mut score = score * factor;
                if negated {
                    score *= -0.5;
                }
                total += score;
                hits += 1;
                negated = false;
                factor = 1.0;
            } else if Self::is_negator(word) {
                negated = true;
            } else if let Some(boost) = INTENSIFIERS.get(word) {
                factor = *boost;
            } else {
                negated = false;
                factor = 1.0;
            }
        }

        if hits == 0 {
            return Ok(0.0);
        }
        Ok((total / hits as f64).clamp(-1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polarity(text: &str) -> f64 {
        LexiconSentiment.polarity(text).unwrap()
    }

    #[test]
    fn test_no_opinion_words_is_zero() {
        assert_eq!(polarity(""), 0.0);
        assert_eq!(polarity("Metro timings for Tuesday"), 0.0);
    }

    #[test]
    fn test_positive_and_negative_text() {
        assert!(polarity("A great and successful festival") > 0.1);
        assert!(polarity("Terrible traffic chaos after the collapse") < -0.1);
    }

    #[test]
    fn test_negation_flips_and_dampens() {
        let plain = polarity("good roads");
        let negated = polarity("not good roads");
        assert!(plain > 0.0);
        assert!(negated < 0.0);
        assert!((negated + plain * 0.5).abs() < 1e-9);
        assert!(polarity("the roads aren't good") < 0.0);
    }

    #[test]
    fn test_intensifier_scales_and_clamps() {
        assert!(polarity("very good") > polarity("good"));
        assert_eq!(polarity("extremely excellent"), 1.0);
    }

    #[test]
    fn test_emergency_headline_is_not_positive() {
        assert!(polarity("Major fire emergency in Mumbai urgent evacuation underway") <= 0.1);
    }
}
