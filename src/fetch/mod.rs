// src/fetch/mod.rs
// =============================================================================
// This module turns a URL into the set of links found on that page.
//
// Submodules:
// - http: Fetches a page over HTTP (reqwest) with a fixed timeout/user-agent
// - html: Extracts absolute link targets from an HTML document (scraper)
//
// The crawl engine never talks to reqwest directly. It only sees the
// `PageFetcher` trait below, so tests can swap in an in-memory link graph.
//
// Rust concepts:
// - Traits: A shared interface that different types can implement
// - async-trait: Lets a trait have async methods and still be used as
//   `Arc<dyn PageFetcher>`
// =============================================================================

mod html;
mod http;

use std::collections::HashSet;

use async_trait::async_trait;
use url::Url;

use crate::error::FetchError;

pub use http::HttpFetcher;

// Fetches one page and returns its outbound links
//
// Implementations must be safe to call from many worker tasks at once
// (Send + Sync), because every task in a round shares the same fetcher.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the absolute `href` targets of every anchor on the page,
    /// or a FetchError if the page could not be fetched or parsed.
    async fn fetch_links(&self, url: &str) -> Result<HashSet<String>, FetchError>;
}

// Checks whether a string is a syntactically valid http/https URL
//
// Examples:
//   "https://example.com/docs" -> true
//   "ftp://example.com"        -> false (wrong scheme)
//   "not-a-url"                -> false (no scheme at all)
//   "https://"                 -> false (no host)
pub fn is_valid_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().map_or(false, |host| !host.is_empty())
        }
        Err(_) => false,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of just a function?
//    - The engine only needs "give me the links on this page"
//    - In production that means HTTP + HTML parsing
//    - In tests we want a fake that never touches the network
//    - A trait lets both live behind the same `Arc<dyn PageFetcher>`
//
// 2. Why #[async_trait]?
//    - Trait objects (dyn Trait) can't have plain async fns
//    - async_trait rewrites them to return a boxed future
//
// 3. What does map_or do?
//    - map_or(default, f) on an Option returns `default` for None
//      and `f(value)` for Some(value)
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_http_urls() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/path?q=1"));
        assert!(is_valid_url("https://blog.example.com/x"));
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("javascript:void(0)"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(!is_valid_url("not-a-url"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
    }
}
