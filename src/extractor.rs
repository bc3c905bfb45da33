//! Field extraction from parsed article pages.
//!
//! Every field is resolved by a [`FallbackChain`]: an ordered list of
//! strategies, each a pure function of the page that either yields a value
//! or passes. The first strategy to yield wins. A field whose chain is
//! exhausted stays empty; that is a normal outcome, not an error.
//!
//! The chains are built once from a [`SiteProfile`], so selector strings are
//! parsed up front and a malformed one fails at startup rather than per page.

use crate::config::SiteProfile;
use crate::error::PulseError;
use crate::models::RawFields;
use crate::utils::{collapse_whitespace, format_timestamp, truncate_chars};
use chrono::{Local, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A parsed page together with the URL relative links resolve against.
#[derive(Clone, Copy)]
pub struct Page<'a> {
    pub document: &'a Html,
    pub base_url: &'a Url,
}

type Strategy<T> = Box<dyn Fn(&Page<'_>) -> Option<T> + Send + Sync>;

/// Ordered strategies evaluated until one yields a value.
pub struct FallbackChain<T> {
    strategies: Vec<Strategy<T>>,
}

impl<T> Default for FallbackChain<T> {
    fn default() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }
}

impl<T> FallbackChain<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a strategy with lower priority than those already present.
    pub fn with<F>(mut self, strategy: F) -> Self
    where
        F: Fn(&Page<'_>) -> Option<T> + Send + Sync + 'static,
    {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn resolve(&self, page: &Page<'_>) -> Option<T> {
        self.strategies.iter().find_map(|strategy| strategy(page))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl<T> std::fmt::Debug for FallbackChain<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field("strategies", &self.strategies.len())
            .finish()
    }
}

/// Parse a list of CSS selectors, keeping their order.
pub(crate) fn parse_selectors(patterns: &[String]) -> Result<Vec<Selector>, PulseError> {
    patterns
        .iter()
        .map(|pattern| {
            Selector::parse(pattern).map_err(|e| PulseError::Selector(format!("{pattern}: {e}")))
        })
        .collect()
}

/// Visible text of an element, whitespace collapsed.
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// First matching element with non-empty text.
fn text_of(selector: Selector) -> impl Fn(&Page<'_>) -> Option<String> + Send + Sync + 'static {
    move |page: &Page<'_>| {
        page.document
            .select(&selector)
            .map(|element| element_text(&element))
            .find(|text| !text.is_empty())
    }
}

/// Concatenated text of substantial blocks, stopping once past `max_chars`.
fn blocks_of(
    selector: Selector,
    min_chars: usize,
    max_chars: usize,
) -> impl Fn(&Page<'_>) -> Option<String> + Send + Sync + 'static {
    move |page: &Page<'_>| {
        let mut accumulated = String::new();
        let mut chars = 0usize;
        for element in page.document.select(&selector) {
            let text = element_text(&element);
            let len = text.chars().count();
            if len <= min_chars {
                continue;
            }
            accumulated.push_str(&text);
            accumulated.push(' ');
            chars += len + 1;
            if chars > max_chars {
                break;
            }
        }
        let trimmed = accumulated.trim();
        (!trimmed.is_empty()).then(|| truncate_chars(trimmed, max_chars).to_string())
    }
}

/// First attribute value that resolves to an acceptable absolute URL.
///
/// `attributes` are tried in order per element, so a lazy-load attribute
/// listed first shadows the primary `src`.
fn url_attr_of(
    selector: Selector,
    attributes: Vec<String>,
    rejected_markers: Vec<String>,
) -> impl Fn(&Page<'_>) -> Option<String> + Send + Sync + 'static {
    move |page: &Page<'_>| {
        page.document.select(&selector).find_map(|element| {
            let raw = attributes
                .iter()
                .filter_map(|attr| element.value().attr(attr))
                .map(str::trim)
                .find(|value| !value.is_empty())?;
            let resolved = page.base_url.join(raw).ok()?.to_string();
            if rejected_markers
                .iter()
                .any(|marker| resolved.contains(marker.as_str()))
            {
                None
            } else {
                Some(resolved)
            }
        })
    }
}

/// Extracts [`RawFields`] from article pages of one site.
#[derive(Debug)]
pub struct FieldExtractor {
    title: FallbackChain<String>,
    description: FallbackChain<String>,
    image: FallbackChain<String>,
    video: FallbackChain<String>,
    location: FallbackChain<String>,
    timestamp: FallbackChain<String>,
}

impl FieldExtractor {
    /// Build the selector chains described by `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Selector`] if any selector string is malformed.
    pub fn from_profile(profile: &SiteProfile) -> Result<Self, PulseError> {
        let text_chain = |patterns: &[String]| -> Result<FallbackChain<String>, PulseError> {
            Ok(parse_selectors(patterns)?
                .into_iter()
                .fold(FallbackChain::new(), |chain, selector| {
                    chain.with(text_of(selector))
                }))
        };

        let description = parse_selectors(&profile.description_selectors)?
            .into_iter()
            .fold(FallbackChain::new(), |chain, selector| {
                chain.with(blocks_of(
                    selector,
                    profile.min_block_chars,
                    profile.max_description_chars,
                ))
            });

        let image = parse_selectors(&profile.image_selectors)?
            .into_iter()
            .fold(FallbackChain::new(), |chain, selector| {
                chain.with(url_attr_of(
                    selector,
                    profile.image_attributes.clone(),
                    profile.low_quality_image_markers.clone(),
                ))
            });

        let video = parse_selectors(&profile.video_selectors)?
            .into_iter()
            .fold(FallbackChain::new(), |chain, selector| {
                chain.with(url_attr_of(
                    selector,
                    profile.video_attributes.clone(),
                    Vec::new(),
                ))
            });

        Ok(Self {
            title: text_chain(profile.title_selectors.as_slice())?,
            description,
            image,
            video,
            location: text_chain(profile.location_selectors.as_slice())?,
            timestamp: text_chain(profile.timestamp_selectors.as_slice())?,
        })
    }

    /// Extract fields, stamping pages without a timestamp with the current time.
    pub fn extract(&self, document: &Html, base_url: &Url) -> RawFields {
        self.extract_at(document, base_url, Local::now().naive_local())
    }

    /// Extract fields using `fallback_time` when the page carries no timestamp.
    pub fn extract_at(
        &self,
        document: &Html,
        base_url: &Url,
        fallback_time: NaiveDateTime,
    ) -> RawFields {
        let page = Page { document, base_url };
        RawFields {
            title: self.title.resolve(&page).unwrap_or_default(),
            description: self.description.resolve(&page).unwrap_or_default(),
            image_url: self.image.resolve(&page).unwrap_or_default(),
            video_url: self.video.resolve(&page).unwrap_or_default(),
            location: self.location.resolve(&page).unwrap_or_default(),
            timestamp: self
                .timestamp
                .resolve(&page)
                .unwrap_or_else(|| format_timestamp(fallback_time)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn extractor() -> FieldExtractor {
        FieldExtractor::from_profile(&SiteProfile::default()).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://timesofindia.indiatimes.com/city/mumbai/articleshow/1.cms").unwrap()
    }

    fn fallback() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 19)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn extract(html: &str) -> RawFields {
        let document = Html::parse_document(html);
        extractor().extract_at(&document, &base(), fallback())
    }

    fn paragraph(seed: &str, len: usize) -> String {
        seed.chars().cycle().take(len).collect()
    }

    #[test]
    fn test_fallback_chain_short_circuits() {
        let document = Html::parse_document("<p>x</p>");
        let url = base();
        let page = Page {
            document: &document,
            base_url: &url,
        };
        let chain: FallbackChain<&'static str> = FallbackChain::new()
            .with(|_: &Page<'_>| None)
            .with(|_: &Page<'_>| Some("second"))
            .with(|_: &Page<'_>| Some("third"));
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.resolve(&page), Some("second"));
        assert_eq!(FallbackChain::<u8>::new().resolve(&page), None);
    }

    #[test]
    fn test_title_prefers_higher_priority_selector() {
        let fields = extract(
            r#"<html><body>
                <h1>Generic heading</h1>
                <h1 class="HNMDR_title">  Metro line   opens
                </h1>
            </body></html>"#,
        );
        assert_eq!(fields.title, "Metro line opens");
    }

    #[test]
    fn test_title_skips_empty_match() {
        let fields = extract(r#"<h1 class="article-title">   </h1><div class="headline">Rain alert</div>"#);
        assert_eq!(fields.title, "Rain alert");
    }

    #[test]
    fn test_missing_fields_stay_empty() {
        let fields = extract("<html><body><div>nothing here</div></body></html>");
        assert_eq!(fields.title, "");
        assert_eq!(fields.description, "");
        assert_eq!(fields.image_url, "");
        assert_eq!(fields.video_url, "");
        assert_eq!(fields.location, "");
        assert_eq!(fields.timestamp, "2025-07-19 08:30:00");
    }

    #[test]
    fn test_description_ignores_short_blocks() {
        let long = paragraph("Water supply will be cut in parts of the city. ", 120);
        let html = format!("<p>Share</p><p>{long}</p><p>Ad</p>");
        let fields = extract(&html);
        assert_eq!(fields.description, long.trim());
    }

    #[test]
    fn test_description_first_selector_with_text_wins() {
        let normal = paragraph("Normal body text about the municipal budget. ", 90);
        let para = paragraph("Paragraph text that should not be used at all. ", 90);
        let html = format!(r#"<div class="Normal">{normal}</div><p>{para}</p>"#);
        let fields = extract(&html);
        assert_eq!(fields.description, normal.trim());
    }

    #[test]
    fn test_description_truncated_to_limit() {
        let block = paragraph("abcdefghij", 300);
        let html = format!("<p>{block}</p><p>{block}</p><p>{block}</p><p>{block}</p>");
        let fields = extract(&html);
        assert_eq!(fields.description.chars().count(), 800);
    }

    #[test]
    fn test_description_exactly_at_limit_is_kept() {
        let block = paragraph("abcdefghij", 800);
        let fields = extract(&format!("<p>{block}</p>"));
        assert_eq!(fields.description, block);
    }

    #[test]
    fn test_description_below_limit_unmodified() {
        let block = paragraph("abcdefghij", 799);
        let fields = extract(&format!("<p>{block}</p>"));
        assert_eq!(fields.description, block);
    }

    #[test]
    fn test_image_prefers_lazy_load_and_resolves() {
        let fields = extract(r#"<img data-src="/photos/flood.jpg" src="/placeholder.gif">"#);
        assert_eq!(
            fields.image_url,
            "https://timesofindia.indiatimes.com/photos/flood.jpg"
        );
    }

    #[test]
    fn test_image_rejects_low_quality_marker() {
        let fields = extract(
            r#"<img class="img-responsive" src="/thumb/123.cms">
               <img src="https://static.example.com/photo.png">"#,
        );
        assert_eq!(fields.image_url, "https://static.example.com/photo.png");
    }

    #[test]
    fn test_video_from_embedded_player() {
        let fields = extract(r#"<iframe src="//www.youtube.com/embed/abc"></iframe>"#);
        assert_eq!(fields.video_url, "https://www.youtube.com/embed/abc");
    }

    #[test]
    fn test_video_from_data_attribute() {
        let fields = extract(r#"<div data-video-url="https://cdn.example.com/v.mp4"></div>"#);
        assert_eq!(fields.video_url, "https://cdn.example.com/v.mp4");
    }

    #[test]
    fn test_direct_video_source_wins() {
        let fields = extract(
            r#"<video><source src="/media/clip.mp4"></video>
               <iframe src="https://player.vimeo.com/video/1"></iframe>"#,
        );
        assert_eq!(
            fields.video_url,
            "https://timesofindia.indiatimes.com/media/clip.mp4"
        );
    }

    #[test]
    fn test_location_and_timestamp() {
        let fields = extract(
            r#"<span class="dateline">PUNE</span>
               <time>Jul 19, 2025, 10:12 IST</time>"#,
        );
        assert_eq!(fields.location, "PUNE");
        assert_eq!(fields.timestamp, "Jul 19, 2025, 10:12 IST");
    }

    #[test]
    fn test_extract_uses_wall_clock_fallback() {
        let document = Html::parse_document("<h1>Title</h1>");
        let fields = extractor().extract(&document, &base());
        assert!(NaiveDateTime::parse_from_str(&fields.timestamp, crate::utils::TIMESTAMP_FORMAT).is_ok());
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let profile = SiteProfile {
            title_selectors: vec!["h1[".to_string()],
            ..SiteProfile::default()
        };
        let err = FieldExtractor::from_profile(&profile).unwrap_err();
        assert!(matches!(err, PulseError::Selector(_)));
    }
}
