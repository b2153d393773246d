// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// There are three kinds of failure, and they are handled very differently:
// - ValidationError: the request itself is bad. Raised before any crawling
//   starts and returned to the caller (no partial result).
// - FetchError: one page could not be fetched or parsed. Logged by the worker
//   and never propagated; the page still counts as visited.
// - PoolError: the worker pool is saturated. The dispatcher puts the URL back
//   on the frontier and tries again next round.
//
// We use `thiserror` to derive Display + std::error::Error for each enum, so
// the binary can still wrap them in anyhow::Error with `?`.
// =============================================================================

use thiserror::Error;

/// The crawl request was rejected before any work began.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Base URL is not a syntactically valid http/https URL
    #[error("Invalid base URL provided: {0}")]
    InvalidBaseUrl(String),
    /// maxConcurrent must be at least 1
    #[error("Max concurrent processes must be greater than 0")]
    InvalidMaxConcurrent(usize),
}

/// A single page could not be fetched or parsed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request timed out
    #[error("request timed out")]
    Timeout,
    /// Could not connect (DNS failure, refused, unreachable)
    #[error("connection failed: {0}")]
    Connect(String),
    /// Server answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),
    /// Response was not an HTML document
    #[error("not an HTML page (content-type: {0})")]
    NotHtml(String),
    /// Any other reqwest failure
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// The worker pool refused a task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("worker pool saturated ({outstanding} tasks outstanding, capacity {capacity})")]
    Rejected { outstanding: usize, capacity: usize },
}
