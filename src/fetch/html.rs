// src/fetch/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to resolve relative hrefs against the page URL.
//
// Note: we do NOT filter by scheme or domain here. The extractor reports every
// anchor target it can resolve; deciding which ones to crawl is the
// dispatcher's job.
// =============================================================================

use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

// Extracts the absolute targets of all <a href> elements
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL the HTML was fetched from (for resolving relative links)
//
// Returns: HashSet<String> of absolute URLs (duplicates on the page collapse)
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='/docs'>Again</a>"
//   page_url = "https://example.com/page"
//   result = {"https://example.com/docs"}
pub fn extract_html_links(html: &str, page_url: &str) -> HashSet<String> {
    let mut links = HashSet::new();

    // If the page URL itself is unusable we can't resolve anything
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return links,
    };

    let document = Html::parse_document(html);

    // Our selector is a constant and known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_href(&base, href) {
                links.insert(absolute_url);
            }
        }
    }

    links
}

// Resolves a possibly-relative href to an absolute URL
//
// Url::join handles both cases: an absolute href replaces the base,
// a relative one is resolved against it (like a browser does).
// Blank hrefs and hrefs that can't be resolved produce None.
fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    base.join(href).ok().map(|url| url.to_string())
}
