// src/crawl/test_support.rs
// In-memory PageFetcher for tests: a fixed link graph, optional failures and
// delay, and per-URL call counting.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::FetchError;
use crate::fetch::PageFetcher;

#[derive(Debug, Default)]
pub struct GraphFetcher {
    pages: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    delay: Duration,
    calls: DashMap<String, usize>,
    running: AtomicUsize,
    peak_running: AtomicUsize,
}

impl GraphFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, links: &[&str]) -> Self {
        self.pages
            .insert(url.to_string(), links.iter().map(|l| l.to_string()).collect());
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.get(url).map(|c| *c).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|entry| *entry.value()).sum()
    }

    /// Highest number of fetches that were running at the same moment.
    pub fn peak_running(&self) -> usize {
        self.peak_running.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for GraphFetcher {
    async fn fetch_links(&self, url: &str) -> Result<HashSet<String>, FetchError> {
        *self.calls.entry(url.to_string()).or_insert(0) += 1;

        let now_running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_running.fetch_max(now_running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.running.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(url) {
            return Err(FetchError::Status(500));
        }

        // Unknown pages exist but have no links
        Ok(self
            .pages
            .get(url)
            .map(|links| links.iter().cloned().collect())
            .unwrap_or_default())
    }
}
