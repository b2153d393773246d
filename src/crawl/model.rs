// src/crawl/model.rs
// =============================================================================
// The data that goes into a crawl and the data that comes out of it.
//
// - CrawlRequest: what the operator asked for (built once from the CLI,
//   read-only afterwards, shared with every worker through an Arc)
// - CrawlResult: what we report back (visited URLs, elapsed time, page count)
// =============================================================================

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::error::ValidationError;
use crate::fetch::is_valid_url;

/// One crawl invocation's parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    pub base_url: String,
    pub same_domain_only: bool,
    pub max_concurrent: usize,
}

impl CrawlRequest {
    pub fn new(base_url: impl Into<String>, same_domain_only: bool, max_concurrent: usize) -> Self {
        Self {
            base_url: base_url.into(),
            same_domain_only,
            max_concurrent,
        }
    }

    // Checks the request before any crawl state is created
    //
    // The base URL must be a valid http/https URL and at least one
    // task per round must be allowed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_url(&self.base_url) {
            return Err(ValidationError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.max_concurrent < 1 {
            return Err(ValidationError::InvalidMaxConcurrent(self.max_concurrent));
        }
        Ok(())
    }
}

/// Outcome of a crawl (complete or interrupted).
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    /// Every URL that was claimed for fetching, in lexicographic order
    pub visited_urls: BTreeSet<String>,
    /// Subset of visited_urls whose fetch failed
    pub failed_urls: BTreeSet<String>,
    /// Wall-clock time from crawl start to loop exit
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
    /// Always equal to visited_urls.len()
    pub total_pages: usize,
    /// True if the crawl stopped because it was interrupted
    pub interrupted: bool,
    /// Number of dispatcher rounds the control loop ran
    pub rounds: usize,
}

impl CrawlResult {
    pub fn new(
        visited_urls: BTreeSet<String>,
        failed_urls: BTreeSet<String>,
        duration: Duration,
        interrupted: bool,
    ) -> Self {
        let total_pages = visited_urls.len();
        Self {
            visited_urls,
            failed_urls,
            duration,
            total_pages,
            interrupted,
            rounds: 0,
        }
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
