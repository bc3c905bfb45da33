//! Static configuration consumed by the extractor, classifier and scorer.
//!
//! Everything here is plain data: the category lexicon, urgency weights,
//! the gazetteer, and the selector profile for the scraped site. The
//! [`Default`] implementations carry the built-in Times of India tables;
//! a YAML file can override any subset of them without code changes.
//!
//! # Example
//!
//! ```yaml
//! lexicon:
//!   gazetteer: ["Pune", "Nagpur"]
//!   emergency_keywords: ["urgent", "alert"]
//! site:
//!   base_url: "https://example.com"
//! ```

use crate::error::PulseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, instrument};

/// Root configuration: classification lexicon plus the site's selector profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Keyword tables driving classification and scoring.
    pub lexicon: Lexicon,
    /// Where and how to scrape.
    pub site: SiteProfile,
}

impl PulseConfig {
    /// Parse a configuration from YAML text. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PulseError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a configuration file from disk.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PulseError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        info!(
            categories = config.lexicon.categories.len(),
            places = config.lexicon.gazetteer.len(),
            base_url = %config.site.base_url,
            "Loaded configuration"
        );
        Ok(config)
    }
}

/// A category label and the keyword substrings that trigger it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CategoryKeywords {
    pub category: String,
    pub keywords: Vec<String>,
}

/// A URL substring that implies a category (e.g. `/sports/` -> `sports`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct UrlHint {
    pub pattern: String,
    pub category: String,
}

/// Category lexicon, urgency table and gazetteer.
///
/// Category order matters: it decides the order of a record's categories and
/// therefore its `type`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Lexicon {
    pub categories: Vec<CategoryKeywords>,
    /// Checked in order; only the first matching hint applies.
    pub url_hints: Vec<UrlHint>,
    pub urgency_weights: BTreeMap<String, i32>,
    /// Weight for categories missing from `urgency_weights`.
    pub default_urgency_weight: i32,
    pub emergency_keywords: Vec<String>,
    /// Categories that make a record relevant for the city pulse feed.
    pub actionable_categories: Vec<String>,
    pub gazetteer: Vec<String>,
    /// Polarity magnitude above which a text counts as positive or negative.
    pub sentiment_threshold: f64,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn category(name: &str, keywords: &[&str]) -> CategoryKeywords {
    CategoryKeywords {
        category: name.to_string(),
        keywords: strings(keywords),
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        let categories = vec![
            category(
                "traffic",
                &[
                    "traffic", "jam", "accident", "road", "vehicle", "collision", "highway",
                    "flyover", "signal", "congestion",
                ],
            ),
            category(
                "civic",
                &[
                    "pothole", "garbage", "streetlight", "water", "drain", "sewage",
                    "electricity", "power cut", "municipal", "civic",
                ],
            ),
            category(
                "weather",
                &[
                    "rain", "flood", "weather", "storm", "cyclone", "heat", "temperature",
                    "humidity", "waterlogging",
                ],
            ),
            category(
                "emergency",
                &[
                    "fire", "accident", "emergency", "rescue", "ambulance", "police", "crime",
                    "safety",
                ],
            ),
            category(
                "events",
                &[
                    "event", "festival", "protest", "rally", "meeting", "gathering", "cultural",
                    "celebration",
                ],
            ),
            category(
                "infrastructure",
                &[
                    "metro", "bus", "transport", "construction", "building", "bridge", "flyover",
                    "road work",
                ],
            ),
            category(
                "health",
                &[
                    "hospital", "health", "medical", "doctor", "clinic", "covid", "vaccination",
                    "disease",
                ],
            ),
            category(
                "education",
                &[
                    "school", "college", "university", "student", "education", "exam",
                    "admission",
                ],
            ),
        ];

        let url_hints = [
            ("/city/", "city"),
            ("/sports/", "sports"),
            ("/business/", "business"),
            ("/world/", "world"),
            ("/india/", "india"),
        ]
        .iter()
        .map(|(pattern, category)| UrlHint {
            pattern: pattern.to_string(),
            category: category.to_string(),
        })
        .collect();

        let urgency_weights = [
            ("emergency", 10),
            ("traffic", 7),
            ("weather", 8),
            ("civic", 6),
            ("health", 8),
            ("infrastructure", 5),
            ("events", 4),
            ("education", 3),
            ("general", 2),
        ]
        .iter()
        .map(|(name, weight)| (name.to_string(), *weight))
        .collect();

        Self {
            categories,
            url_hints,
            urgency_weights,
            default_urgency_weight: 2,
            emergency_keywords: strings(&[
                "urgent",
                "emergency",
                "critical",
                "danger",
                "alert",
                "warning",
            ]),
            actionable_categories: strings(&[
                "traffic",
                "civic",
                "weather",
                "emergency",
                "events",
                "infrastructure",
                "health",
            ]),
            gazetteer: strings(&[
                "Mumbai", "Delhi", "Bangalore", "Bengaluru", "Chennai", "Kolkata", "Hyderabad",
                "Pune", "Ahmedabad", "Surat", "Jaipur", "Lucknow", "Kanpur", "Nagpur", "Patna",
                "Indore", "Thane", "Bhopal", "Visakhapatnam", "Pimpri", "Vadodara", "Ghaziabad",
                "Ludhiana", "Nashik", "Faridabad", "Meerut", "Rajkot", "Kalyan", "Vasai",
                "Varanasi", "Srinagar", "Aurangabad", "Dhanbad", "Amritsar", "Navi Mumbai",
                "Allahabad", "Ranchi", "Howrah", "Coimbatore", "Jabalpur", "Gwalior",
                "Vijayawada", "Jodhpur", "Madurai", "Raipur", "Kota", "Guwahati", "Chandigarh",
                "Solapur", "Hubballi", "Bareilly", "Moradabad", "Bhubaneswar", "Cuttack",
                "Rourkela", "Berhampur", "Sambalpur",
            ]),
            sentiment_threshold: 0.1,
        }
    }
}

impl Lexicon {
    /// Urgency weight of a category, falling back to the default weight.
    pub fn urgency_weight(&self, category: &str) -> i32 {
        self.urgency_weights
            .get(category)
            .copied()
            .unwrap_or(self.default_urgency_weight)
    }

    pub fn is_actionable(&self, category: &str) -> bool {
        self.actionable_categories.iter().any(|c| c == category)
    }
}

/// Selector profile for one news site.
///
/// Every selector list is an ordered fallback chain: earlier entries win.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteProfile {
    /// Human-readable source name stored on every record.
    pub name: String,
    pub base_url: String,
    /// Section paths appended to `base_url` during link discovery.
    pub sections: Vec<String>,
    pub link_selectors: Vec<String>,
    pub title_selectors: Vec<String>,
    pub description_selectors: Vec<String>,
    pub image_selectors: Vec<String>,
    /// Attributes read from an image element, lazy-load attribute first.
    pub image_attributes: Vec<String>,
    /// Substrings marking placeholder or low-quality images.
    pub low_quality_image_markers: Vec<String>,
    pub video_selectors: Vec<String>,
    pub video_attributes: Vec<String>,
    pub location_selectors: Vec<String>,
    pub timestamp_selectors: Vec<String>,
    /// Description blocks at or below this many characters are ignored.
    pub min_block_chars: usize,
    pub max_description_chars: usize,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            name: "Times of India".to_string(),
            base_url: "https://timesofindia.indiatimes.com".to_string(),
            sections: strings(&[
                "",
                "/city",
                "/india",
                "/world",
                "/business",
                "/sports",
                "/entertainment",
                "/tech",
            ]),
            link_selectors: strings(&[
                r#"a[href*="/articleshow/"]"#,
                r#"a[href*="/city/"]"#,
                r#"a[href*="/india/"]"#,
                r#"a[href*="/world/"]"#,
                r#"a[href*="/business/"]"#,
                r#"a[href*="/sports/"]"#,
                r#"a[href*="/entertainment/"]"#,
            ]),
            title_selectors: strings(&[
                r#"h1[class*="HNMDR"]"#,
                "h1.article-title",
                "h1._3YYSt",
                "h1",
                ".headline",
            ]),
            description_selectors: strings(&[
                r#"div[class*="ga-headline"]"#,
                "div.article-content",
                "div._1Y49U",
                "div.Normal",
                "p",
            ]),
            image_selectors: strings(&[
                r#"img[class*="img-responsive"]"#,
                "img[data-src]",
                r#"img[src*="jpg"]"#,
                r#"img[src*="png"]"#,
                r#"img[src*="jpeg"]"#,
            ]),
            image_attributes: strings(&["data-src", "src"]),
            low_quality_image_markers: strings(&[".cms"]),
            video_selectors: strings(&[
                "video source",
                r#"iframe[src*="youtube"]"#,
                r#"iframe[src*="vimeo"]"#,
                "div[data-video-url]",
            ]),
            video_attributes: strings(&["src", "data-video-url"]),
            location_selectors: strings(&[
                r#"span[class*="location"]"#,
                "span.dateline",
                "span.place-name",
            ]),
            timestamp_selectors: strings(&[
                r#"span[class*="timestamp"]"#,
                "span.time",
                "time",
                "span.article-time",
                "div.byline",
            ]),
            min_block_chars: 50,
            max_description_chars: 800,
        }
    }
}

impl SiteProfile {
    /// Absolute URL of every section page, in crawl order.
    pub fn section_urls(&self) -> Vec<String> {
        let base = self.base_url.trim_end_matches('/');
        self.sections
            .iter()
            .map(|section| format!("{}{}", base, section))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lexicon_tables() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.categories.len(), 8);
        assert_eq!(lexicon.categories[0].category, "traffic");
        assert_eq!(lexicon.urgency_weight("emergency"), 10);
        assert_eq!(lexicon.urgency_weight("sports"), 2);
        assert!(lexicon.is_actionable("health"));
        assert!(!lexicon.is_actionable("education"));
    }

    #[test]
    fn test_section_urls() {
        let profile = SiteProfile {
            base_url: "https://example.com/".to_string(),
            sections: vec!["".to_string(), "/city".to_string()],
            ..SiteProfile::default()
        };
        assert_eq!(
            profile.section_urls(),
            vec!["https://example.com", "https://example.com/city"]
        );
    }

    #[test]
    fn test_yaml_overrides_only_given_keys() {
        let yaml = r#"
lexicon:
  gazetteer: ["Springfield"]
  default_urgency_weight: 1
site:
  name: "Springfield Gazette"
"#;
        let config = PulseConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.lexicon.gazetteer, vec!["Springfield"]);
        assert_eq!(config.lexicon.urgency_weight("unknown"), 1);
        assert_eq!(config.lexicon.categories.len(), 8);
        assert_eq!(config.site.name, "Springfield Gazette");
        assert_eq!(config.site.max_description_chars, 800);
    }

    #[test]
    fn test_yaml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let yaml = serde_yaml::to_string(&PulseConfig::default()).unwrap();
        std::fs::write(&path, yaml).unwrap();

        let config = PulseConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.lexicon.categories, Lexicon::default().categories);
        assert_eq!(config.site.title_selectors.len(), 5);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = PulseConfig::from_yaml_str("lexicon: [not, a, map").unwrap_err();
        assert!(matches!(err, PulseError::Yaml(_)));
    }
}
