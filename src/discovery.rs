//! Article link discovery on listing pages.
//!
//! [`LinkDiscoverer`] pulls candidate article URLs out of a single listing
//! page. [`LinkPool`] accumulates them across the site's sections for one
//! run, keeping first-seen order and rejecting repeats in O(1).

use crate::config::SiteProfile;
use crate::error::PulseError;
use crate::extractor::parse_selectors;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts article permalinks from listing pages.
#[derive(Debug, Clone)]
pub struct LinkDiscoverer {
    selectors: Vec<Selector>,
}

impl LinkDiscoverer {
    pub fn from_profile(profile: &SiteProfile) -> Result<Self, PulseError> {
        Ok(Self {
            selectors: parse_selectors(&profile.link_selectors)?,
        })
    }

    /// Absolute, deduplicated article URLs in selector-then-document order.
    pub fn discover(&self, document: &Html, base_url: &Url) -> Vec<String> {
        let mut pool = LinkPool::default();
        for selector in &self.selectors {
            for element in document.select(selector) {
                let Some(href) = element.value().attr("href") else {
                    continue;
                };
                if let Some(url) = resolve_href(href, base_url) {
                    pool.insert(url);
                }
            }
        }
        pool.into_links()
    }
}

/// Resolve an href to an absolute http(s) URL without its fragment.
fn resolve_href(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let mut url = base_url.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}

/// Run-scoped, insertion-ordered set of discovered links.
#[derive(Debug, Default)]
pub struct LinkPool {
    seen: HashSet<String>,
    links: Vec<String>,
}

impl LinkPool {
    /// Add a link; returns `false` if it was already present.
    pub fn insert(&mut self, link: String) -> bool {
        if self.seen.contains(&link) {
            return false;
        }
        self.seen.insert(link.clone());
        self.links.push(link);
        true
    }

    /// Add unseen links until the pool holds `target` entries.
    ///
    /// Returns how many links were added.
    pub fn extend_until<I>(&mut self, links: I, target: usize) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut added = 0;
        for link in links {
            if self.is_full(target) {
                break;
            }
            if self.insert(link) {
                added += 1;
            }
        }
        added
    }

    pub fn is_full(&self, target: usize) -> bool {
        self.links.len() >= target
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn into_links(self) -> Vec<String> {
        self.links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discoverer() -> LinkDiscoverer {
        LinkDiscoverer::from_profile(&SiteProfile::default()).unwrap()
    }

    fn base() -> Url {
        Url::parse("https://timesofindia.indiatimes.com").unwrap()
    }

    #[test]
    fn test_duplicate_hrefs_yield_one_link() {
        let html = r#"
            <a href="/city/pune/traffic-curbs/articleshow/101.cms">one</a>
            <a href="/city/pune/traffic-curbs/articleshow/101.cms">two</a>
            <a href="https://timesofindia.indiatimes.com/city/pune/traffic-curbs/articleshow/101.cms">three</a>
        "#;
        let links = discoverer().discover(&Html::parse_document(html), &base());
        assert_eq!(
            links,
            vec!["https://timesofindia.indiatimes.com/city/pune/traffic-curbs/articleshow/101.cms"]
        );
    }

    #[test]
    fn test_selector_order_then_document_order() {
        let html = r#"
            <a href="/sports/cricket/match">sports</a>
            <a href="/india/news/articleshow/2.cms">india article</a>
            <a href="/world/europe/summit">world</a>
            <a href="/about">about</a>
        "#;
        let links = discoverer().discover(&Html::parse_document(html), &base());
        assert_eq!(
            links,
            vec![
                "https://timesofindia.indiatimes.com/india/news/articleshow/2.cms",
                "https://timesofindia.indiatimes.com/world/europe/summit",
                "https://timesofindia.indiatimes.com/sports/cricket/match",
            ]
        );
    }

    #[test]
    fn test_fragments_and_non_http_skipped() {
        let html = r##"
            <a href="/city/delhi/articleshow/5.cms#comments">a</a>
            <a href="/city/delhi/articleshow/5.cms">b</a>
            <a href="javascript:void('/city/')">c</a>
        "##;
        let links = discoverer().discover(&Html::parse_document(html), &base());
        assert_eq!(
            links,
            vec!["https://timesofindia.indiatimes.com/city/delhi/articleshow/5.cms"]
        );
    }

    #[test]
    fn test_pool_stops_at_target() {
        let mut pool = LinkPool::default();
        let added = pool.extend_until(
            ["a", "b", "a", "c", "d"].iter().map(|s| s.to_string()),
            3,
        );
        assert_eq!(added, 3);
        assert!(pool.is_full(3));
        assert_eq!(pool.into_links(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_pool_dedups_across_sections() {
        let mut pool = LinkPool::default();
        pool.extend_until(vec!["x".to_string(), "y".to_string()], 10);
        let added = pool.extend_until(vec!["y".to_string(), "z".to_string()], 10);
        assert_eq!(added, 1);
        assert_eq!(pool.len(), 3);
    }
}
