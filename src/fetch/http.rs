// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP and hands the body to the HTML
// link extractor.
//
// Key functionality:
// - One shared reqwest Client (connection pooling across all workers)
// - Fixed request timeout and User-Agent taken from CrawlerConfig
// - Non-success statuses and non-HTML responses are failures
// - reqwest errors are categorized (timeout, connect, other) so the log
//   line says something useful
// =============================================================================

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use super::html::extract_html_links;
use super::PageFetcher;
use crate::config::CrawlerConfig;
use crate::error::FetchError;

/// PageFetcher backed by a real HTTP client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the HTTP client from the crawler config
    //
    // Fails only if reqwest can't set up its TLS backend.
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_links(&self, url: &str) -> Result<HashSet<String>, FetchError> {
        let response = self.client.get(url).send().await.map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // A missing content-type is given the benefit of the doubt
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !is_html(&content_type) {
            return Err(FetchError::NotHtml(content_type));
        }

        // Redirects may have moved us; relative links resolve against the final URL
        let final_url = response.url().to_string();
        let body = response.text().await.map_err(categorize_error)?;

        let links = extract_html_links(&body, &final_url);
        debug!(url, links = links.len(), "parsed page");
        Ok(links)
    }
}

// Accepts text/html and the XHTML media type, ignoring parameters like charset
fn is_html(content_type: &str) -> bool {
    if content_type.is_empty() {
        return true;
    }
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

// Categorizes reqwest errors into our FetchError variants
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Request(error)
    }
}
